//! Human-readable report rendering. Consumes the `list()` snapshot plus the
//! aggregate summary from the store and writes a self-contained HTML
//! document; it never touches the database directly.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::StoreResult;
use crate::models::{Book, LibrarySummary};

/// Render the full inventory to an HTML document at `out`, returning the
/// path written. Parent directories are created as needed.
pub fn generate_html_report(
    books: &[Book],
    summary: &LibrarySummary,
    out: &Path,
) -> StoreResult<PathBuf> {
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }

    let html = render_html(books, summary, &Local::now().format("%d/%m/%Y %H:%M").to_string());
    fs::write(out, html)?;
    Ok(out.to_path_buf())
}

fn render_html(books: &[Book], summary: &LibrarySummary, generated_at: &str) -> String {
    let mut rows = String::new();
    for book in books {
        rows.push_str(&format!(
            "      <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>R$ {}</td></tr>\n",
            book.id,
            escape_html(&book.title),
            escape_html(&book.author),
            book.year,
            format_price(book.price),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8">
  <title>Relatório de Livros</title>
  <style>
    body {{ font-family: sans-serif; margin: 2em; }}
    table {{ border-collapse: collapse; width: 100%; }}
    th, td {{ border: 1px solid #999; padding: 0.4em 0.8em; text-align: left; }}
    th {{ background: #eee; }}
    .meta {{ color: #555; }}
  </style>
</head>
<body>
  <h1>Relatório de Livros</h1>
  <p class="meta">Gerado em {generated_at}</p>
  <p>Total de livros: {total} &mdash; Valor total: R$ {total_value} &mdash; Preço médio: R$ {average}</p>
  <table>
    <thead>
      <tr><th>ID</th><th>Título</th><th>Autor</th><th>Ano</th><th>Preço</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
</body>
</html>
"#,
        generated_at = generated_at,
        total = summary.total_books,
        total_value = format_price(summary.total_value),
        average = format_price(summary.average_price),
        rows = rows,
    )
}

/// Prices in the report use the Brazilian decimal comma.
fn format_price(price: f64) -> String {
    format!("{price:.2}").replace('.', ",")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
