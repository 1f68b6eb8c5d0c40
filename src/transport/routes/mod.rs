pub mod download;
pub mod info;
pub mod pages;
pub mod stream;

#[cfg(test)]
pub(crate) mod test_support;
