use std::{fs, path::Path, process::Command, time::SystemTime};

fn main() {
  let now = SystemTime::now()
    .duration_since(SystemTime::UNIX_EPOCH)
    .map(|d| d.as_millis())
    .unwrap_or(0);
  println!("cargo:rustc-env=BUILD_TIME={}", now);

  println!("cargo:rerun-if-changed=.git/HEAD");
  if Path::new(".git/refs/heads").exists() {
    println!("cargo:rerun-if-changed=.git/refs/heads");
  }

  let info = GitInfo::collect();
  println!("cargo:rustc-env=GIT_BRANCH={}", info.branch);
  println!("cargo:rustc-env=GIT_COMMIT={}", info.commit);
  println!("cargo:rustc-env=GIT_COMMIT_SHORT={}", info.short_commit());
  println!("cargo:rustc-env=GIT_COMMIT_TIME={}", info.commit_time);
}

struct GitInfo {
  branch: String,
  commit: String,
  commit_time: u64,
}

impl GitInfo {
  fn collect() -> Self {
    let mut info = Self {
      branch: git(&["rev-parse", "--abbrev-ref", "HEAD"]).unwrap_or_else(|| "unknown".into()),
      commit: git(&["rev-parse", "HEAD"]).unwrap_or_else(|| "unknown".into()),
      commit_time: git(&["show", "-s", "--format=%ct", "HEAD"])
        .and_then(|s| s.parse::<u64>().ok())
        .map(|secs| secs * 1000)
        .unwrap_or(0),
    };

    // no git binary in some build containers
    if info.commit == "unknown" {
      info.read_head();
    }
    info
  }

  fn read_head(&mut self) {
    let Ok(head) = fs::read_to_string(".git/HEAD") else {
      return;
    };
    match head.trim().strip_prefix("ref: ") {
      Some(ref_path) => {
        if let Some(name) = ref_path.rsplit('/').next() {
          self.branch = name.to_string();
        }
        if let Ok(commit) = fs::read_to_string(format!(".git/{}", ref_path)) {
          self.commit = commit.trim().to_string();
        }
      }
      None => self.commit = head.trim().to_string(),
    }
  }

  fn short_commit(&self) -> &str {
    self.commit.get(..7).unwrap_or(&self.commit)
  }
}

fn git(args: &[&str]) -> Option<String> {
  let output = Command::new("git").args(args).output().ok()?;
  if !output.status.success() {
    return None;
  }
  let value = String::from_utf8(output.stdout).ok()?.trim().to_string();
  (!value.is_empty()).then_some(value)
}
