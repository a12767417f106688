//! HTML rendering for the upload portal.

/// Retrieved table loaded for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Escape text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
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

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
        body = body
    )
}

pub fn upload_form() -> String {
    page(
        "Upload transactions",
        "<form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"file\" accept=\".csv,text/csv\">\n\
         <input type=\"submit\" value=\"Upload\">\n\
         </form>\n\
         <p><a href=\"/transactions\">View retrieved transactions</a></p>",
    )
}

pub fn transactions_page(table: Option<&TableView>) -> String {
    let body = match table {
        None => "<p>No transactions retrieved yet.</p>".to_string(),
        Some(table) => {
            let mut html = String::from("<table border=\"1\">\n<thead><tr>");
            for header in &table.headers {
                html.push_str(&format!("<th>{}</th>", escape_html(header)));
            }
            html.push_str("</tr></thead>\n<tbody>\n");
            for row in &table.rows {
                html.push_str("<tr>");
                for cell in row {
                    html.push_str(&format!("<td>{}</td>", escape_html(cell)));
                }
                html.push_str("</tr>\n");
            }
            html.push_str("</tbody>\n</table>");
            html
        }
    };
    page(
        "Retrieved transactions",
        &format!("{}\n<p><a href=\"/\">Upload another file</a></p>", body),
    )
}

pub fn error_page(title: &str, message: &str) -> String {
    page(
        title,
        &format!(
            "<pre>{}</pre>\n<p><a href=\"/\">Back to upload</a></p>",
            escape_html(message)
        ),
    )
}
