// ============================================================
// PAGE RENDERING
// ============================================================
// Server-side HTML for the single-document page, rendered from ViewState.

use crate::application::use_cases::file_loader::FILE_READ_FAILED_MESSAGE;
use crate::domain::view_state::ViewState;

pub const ACCEPTED_TYPES: &str = "image/png,image/jpeg,image/webp,application/pdf";

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; color: #1f2933; }
h1 { font-size: 1.4rem; }
section { margin-bottom: 1.5rem; }
.preview img { max-width: 100%; max-height: 420px; border: 1px solid #d2d6dc; }
.file-info { color: #52606d; font-size: 0.9rem; }
.error { background: #fde8e8; color: #9b1c1c; padding: 0.75rem 1rem; border-radius: 4px; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #d2d6dc; padding: 0.4rem 0.6rem; text-align: left; }
th { background: #f5f7fa; width: 30%; }
button, a.button { padding: 0.5rem 1.2rem; font-size: 1rem; }
button[disabled] { opacity: 0.5; }
"#;

const UPLOAD_SCRIPT: &str = r#"
document.getElementById('file').addEventListener('change', async (event) => {
  const file = event.target.files[0];
  if (!file) return;
  const extractButton = document.getElementById('extract-button');
  extractButton.disabled = true;
  try {
    const response = await fetch('/upload?name=' + encodeURIComponent(file.name), {
      method: 'POST',
      headers: { 'Content-Type': file.type || 'application/octet-stream' },
      body: file,
    });
    if (!response.ok) {
      event.target.value = '';
    }
    // Rejections are recorded server-side; the reload shows them.
    window.location.reload();
  } catch (err) {
    event.target.value = '';
    document.getElementById('upload-error').hidden = false;
  }
});
document.getElementById('extract-form').addEventListener('submit', () => {
  const button = document.getElementById('extract-button');
  button.disabled = true;
  button.textContent = '추출 중...';
});
"#;

pub fn render_page(view: &ViewState) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
<meta charset="utf-8">
<title>영장 정보 추출</title>
<style>{style}</style>
</head>
<body>
<h1>영장 정보 추출</h1>
<section>
<input type="file" id="file" accept="{accept}"{file_disabled}>
{file_info}
</section>
<section id="upload-error" class="error" role="alert" hidden>{read_failed}</section>
{preview}
<section>
<form id="extract-form" method="post" action="/extract">
<button id="extract-button" type="submit"{disabled}>{button_label}</button>
</form>
</section>
{error}
{result}
<script>{script}</script>
</body>
</html>"#,
        style = STYLE,
        accept = ACCEPTED_TYPES,
        file_disabled = if view.is_loading() { " disabled" } else { "" },
        read_failed = FILE_READ_FAILED_MESSAGE,
        file_info = render_file_info(view),
        preview = render_preview(view),
        disabled = if view.can_extract() { "" } else { " disabled" },
        button_label = if view.is_loading() {
            "추출 중..."
        } else {
            "정보 추출"
        },
        error = render_error(view),
        result = render_result(view),
        script = UPLOAD_SCRIPT,
    )
}

fn render_file_info(view: &ViewState) -> String {
    match view.file() {
        Some(file) => format!(
            r#"<p class="file-info">{} ({}, {} bytes)</p>"#,
            escape_html(&file.file_name),
            escape_html(&file.mime_type),
            file.size_bytes
        ),
        None => String::new(),
    }
}

fn render_preview(view: &ViewState) -> String {
    match view.file().and_then(|file| file.preview.as_deref()) {
        Some(data_url) => format!(
            r#"<section class="preview"><img src="{}" alt="미리보기"></section>"#,
            escape_html(data_url)
        ),
        None => String::new(),
    }
}

fn render_error(view: &ViewState) -> String {
    match view.error() {
        Some(message) => format!(
            r#"<section class="error" role="alert">{}</section>"#,
            escape_html(message)
        ),
        None => String::new(),
    }
}

fn render_result(view: &ViewState) -> String {
    let Some(record) = view.record() else {
        return String::new();
    };

    let rows: String = record
        .entries()
        .map(|(label, value)| {
            format!(
                "<tr><th>{}</th><td>{}</td></tr>\n",
                escape_html(label),
                escape_html(value)
            )
        })
        .collect();

    format!(
        r#"<section>
<table>
{rows}</table>
</section>
<section>
<a class="button" href="/export.csv" download>CSV 다운로드</a>
</section>"#,
        rows = rows
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::export_record::map_to_export_record;
    use crate::domain::extraction::RawExtraction;
    use crate::domain::upload::LoadedFile;

    fn image_file() -> LoadedFile {
        LoadedFile {
            file_name: "scan <1>.png".to_string(),
            mime_type: "image/png".to_string(),
            size_bytes: 4,
            preview: Some("data:image/png;base64,AAAA".to_string()),
            base64_payload: "AAAA".to_string(),
        }
    }

    #[test]
    fn test_empty_page_disables_extract() {
        let html = render_page(&ViewState::new());
        assert!(html.contains(r#"<button id="extract-button" type="submit" disabled>정보 추출</button>"#));
        assert!(html.contains(ACCEPTED_TYPES));
        assert!(!html.contains("/export.csv"));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_selected_image_shows_preview_and_enables_extract() {
        let mut view = ViewState::new();
        view.select_file(image_file()).unwrap();
        let html = render_page(&view);
        assert!(html.contains(r#"<img src="data:image/png;base64,AAAA""#));
        assert!(html.contains("scan &lt;1&gt;.png"));
        assert!(html.contains(r#"type="submit">정보 추출</button>"#));
    }

    #[test]
    fn test_loading_disables_extract() {
        let mut view = ViewState::new();
        view.select_file(image_file()).unwrap();
        view.begin_extraction().unwrap();
        let html = render_page(&view);
        assert!(html.contains(r#"type="submit" disabled>추출 중...</button>"#));
        assert!(html.contains(r#"<input type="file" id="file" accept="image/png,image/jpeg,image/webp,application/pdf" disabled>"#));
    }

    #[test]
    fn test_result_table_in_header_order_with_download() {
        let mut view = ViewState::new();
        view.select_file(image_file()).unwrap();
        view.begin_extraction().unwrap();
        let record = map_to_export_record(&RawExtraction {
            requesting_org: "강남경찰서 형사과".to_string(),
            items_to_seize: "<script>".to_string(),
            ..RawExtraction::default()
        });
        view.finish_extraction(Ok(record));

        let html = render_page(&view);
        assert!(html.contains("<tr><th>요청 기관</th><td>강남경찰서</td></tr>"));
        assert!(html.contains("<tr><th>압수할 물건</th><td>&lt;script&gt;</td></tr>"));
        assert!(html.contains(r#"href="/export.csv""#));

        let first = html.find("<th>요청 기관</th>").unwrap();
        let last = html.find("<th>압수할 물건</th>").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_error_message_rendered() {
        let mut view = ViewState::new();
        view.select_file(image_file()).unwrap();
        view.begin_extraction().unwrap();
        view.finish_extraction(Err("추출 실패".to_string()));

        let html = render_page(&view);
        assert!(html.contains(r#"<section class="error" role="alert">추출 실패</section>"#));
        assert!(!html.contains("/export.csv"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
