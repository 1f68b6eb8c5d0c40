use std::{fmt::Write, sync::Arc};

use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::Html,
};

use crate::{
    media::VideoMetadata, server::AppState, sources::youtube::VideoId,
    transport::routes::download::{DownloadRequest, load_metadata},
};

const PAGE_TITLE: &str = "tubefetch";

/// GET /
pub async fn index() -> Html<String> {
    Html(render_page(None, None, ""))
}

/// POST /get-video-info
///
/// Form variant of `POST /download`. Failures are shown inside the page
/// rather than as an error status.
pub async fn video_info_page(
    State(state): State<Arc<AppState>>,
    payload: Result<Form<DownloadRequest>, FormRejection>,
) -> Html<String> {
    let url = match payload {
        Ok(Form(request)) => request.url,
        Err(rejection) => {
            tracing::warn!("POST /get-video-info: unreadable form: {}", rejection);
            None
        }
    };
    tracing::info!("POST /get-video-info url={:?}", url);

    let submitted = url.as_deref().unwrap_or_default();
    match load_metadata(&state, url.as_deref()).await {
        Ok((video_id, metadata)) => Html(render_page(Some((&video_id, &metadata)), None, submitted)),
        Err(e) => {
            let body = e.body();
            let message = match body.details {
                Some(details) => format!("{}: {}", body.error, details),
                None => body.error,
            };
            Html(render_page(None, Some(&message), submitted))
        }
    }
}

fn render_page(video: Option<(&VideoId, &VideoMetadata)>, error: Option<&str>, url: &str) -> String {
    let mut html = String::with_capacity(2048);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{PAGE_TITLE}</title>\n</head>\n<body>\n<h1>{PAGE_TITLE}</h1>\n\
         <form method=\"post\" action=\"/get-video-info\">\n\
         <input type=\"url\" name=\"url\" placeholder=\"https://www.youtube.com/watch?v=...\" value=\"{}\" required>\n\
         <button type=\"submit\">Get formats</button>\n</form>\n",
        escape_html(url)
    );

    if let Some(message) = error {
        let _ = writeln!(html, "<p class=\"error\">{}</p>", escape_html(message));
    }

    if let Some((video_id, metadata)) = video {
        let encoded = urlencoding::encode(&video_id.watch_url()).into_owned();
        let _ = writeln!(html, "<section class=\"video\">");
        let _ = writeln!(html, "<h2>{}</h2>", escape_html(&metadata.title));
        if let Some(thumbnail) = &metadata.thumbnail_url {
            let _ = writeln!(
                html,
                "<img src=\"{}\" alt=\"{}\">",
                escape_html(thumbnail),
                escape_html(&metadata.title)
            );
        }
        let _ = writeln!(html, "<p>Duration: {}</p>\n<ul>", escape_html(&metadata.duration));
        for format in &metadata.formats {
            let _ = writeln!(
                html,
                "<li><a href=\"/download/{}?url={}\">{} {}</a></li>",
                format.itag,
                encoded,
                escape_html(&format.quality),
                escape_html(&format.container)
            );
        }
        let _ = writeln!(html, "</ul>\n</section>");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::routes::test_support::*;

    async fn submit(state: &Arc<AppState>, url: Option<&str>) -> String {
        let form = DownloadRequest {
            url: url.map(str::to_string),
        };
        video_info_page(State(state.clone()), Ok(Form(form))).await.0
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[tokio::test]
    async fn test_index_has_form() {
        let Html(page) = index().await;
        assert!(page.contains("action=\"/get-video-info\""));
        assert!(!page.contains("class=\"error\""));
    }

    #[tokio::test]
    async fn test_renders_formats_as_links() {
        let provider = Arc::new(FakeProvider::new(sample_info()));
        let state = state_with(provider, Arc::default());

        let page = submit(&state, Some("https://youtu.be/dQw4w9WgXcQ")).await;
        assert!(page.contains("<h2>Café – 日本語 Song?!</h2>"));
        assert!(page.contains("Duration: 03:32"));
        assert!(page.contains(
            "/download/251?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DdQw4w9WgXcQ"
        ));
        assert!(page.contains("160kbps mp3"));
    }

    #[tokio::test]
    async fn test_shares_cache_with_json_route() {
        let provider = Arc::new(FakeProvider::new(sample_info()));
        let state = state_with(provider.clone(), Arc::default());

        submit(&state, Some("https://youtu.be/dQw4w9WgXcQ")).await;
        submit(&state, Some("https://www.youtube.com/shorts/dQw4w9WgXcQ")).await;
        assert_eq!(provider.info_calls(), 1);
    }

    #[tokio::test]
    async fn test_errors_render_inside_page() {
        let provider = Arc::new(FakeProvider::new(sample_info()));
        let state = state_with(provider, Arc::default());

        let page = submit(&state, Some("<script>")).await;
        assert!(page.contains("<p class=\"error\">Invalid YouTube URL format</p>"));
        assert!(page.contains("value=\"&lt;script&gt;\""));
        assert!(!page.contains("<section"));

        let failing = state_with(Arc::new(FakeProvider::failing("Sign in to confirm")), Arc::default());
        let page = submit(&failing, Some("https://youtu.be/dQw4w9WgXcQ")).await;
        assert!(page.contains("Failed to process video"));
        assert!(page.contains("Sign in to confirm"));
    }
}
