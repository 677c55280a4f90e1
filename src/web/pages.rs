//! Server-rendered HTML for the index and watch pages.

use crate::catalog::VideoMetadata;

/// Minimal HTML escaping for values interpolated into pages.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_index(videos: &[VideoMetadata]) -> String {
    let mut rows = String::new();
    for video in videos {
        let id = html_escape(&video.id);
        rows.push_str(&format!(
            "    <li><a href=\"/videos/{id}\">{id}</a> <small>uploaded {}</small></li>\n",
            video.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>VOD Cluster</title></head>
<body>
  <h1>Videos</h1>
  <form action="/upload" method="post" enctype="multipart/form-data">
    <input type="file" name="file" accept="video/mp4" required>
    <button type="submit">Upload</button>
  </form>
  <ul>
{rows}  </ul>
</body>
</html>
"#
    )
}

pub fn render_video(video: &VideoMetadata) -> String {
    let id = html_escape(&video.id);
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <title>{id}</title>
  <script src="https://cdn.dashjs.org/latest/dash.all.min.js"></script>
</head>
<body>
  <h1>{id}</h1>
  <p>Uploaded {uploaded}</p>
  <video id="player" controls width="720"></video>
  <script>
    var player = dashjs.MediaPlayer().create();
    player.initialize(document.querySelector("#player"), "/content/{id}/manifest.mpd", false);
  </script>
</body>
</html>
"##,
        uploaded = video.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
    )
}
