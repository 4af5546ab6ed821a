use crate::Result;
use crate::documents::RawValue;
use crate::model::{Control, MetricCard, MetricResult};
use core::fmt::Write;

/// Render the HTML for every card, in card order.
pub fn card_markup(cards: &[MetricCard]) -> Result<Vec<String>> {
    cards
        .iter()
        .map(|card| {
            let mut markup = String::new();
            write_card(&mut markup, card)?;
            Ok(markup)
        })
        .collect()
}

fn write_card<W: Write>(writer: &mut W, card: &MetricCard) -> Result<()> {
    let id = html_escape(&card.id);

    write!(writer, "<div class=\"metric-card\" id=\"{id}-card\"")?;
    if let Some(status) = &card.status {
        write!(writer, " data-status=\"{}\"", html_escape(status))?;
    }
    writeln!(writer, ">")?;

    writeln!(writer, "  <div class=\"card-header\">")?;
    writeln!(writer, "    <span class=\"material-symbols-outlined\">{}</span>", html_escape(&card.icon))?;
    writeln!(writer, "    <h3>{}</h3>", html_escape(&card.title))?;
    writeln!(writer, "  </div>")?;

    if let Some(description) = &card.description {
        writeln!(writer, "  <p class=\"card-description\">{}</p>", html_escape(description))?;
    }

    writeln!(writer, "  <div class=\"metric-controls\">")?;
    if card.controls.is_empty() {
        writeln!(writer, "    <p>No controls defined</p>")?;
    }
    for control in &card.controls {
        write_control(writer, control, &id)?;
    }
    writeln!(writer, "  </div>")?;

    writeln!(writer, "  <div class=\"results\">")?;
    if card.results.is_empty() {
        writeln!(writer, "    <p>No results defined</p>")?;
    }
    for result in &card.results {
        write_result(writer, result)?;
    }
    writeln!(writer, "  </div>")?;

    write!(writer, "</div>")?;
    Ok(())
}

fn write_control<W: Write>(writer: &mut W, control: &Control, card_id: &str) -> Result<()> {
    let id = html_escape(control.id().unwrap_or_default());
    let label = control.label().map_or_else(|| id.clone(), |label| html_escape(&label.to_string()));

    let mut bounds = String::new();
    for (name, value) in [
        ("min", control.min()),
        ("max", control.max()),
        ("value", control.default_value()),
        ("step", control.step()),
    ] {
        if let Some(value) = value {
            write!(bounds, " {name}=\"{}\"", attribute(value))?;
        }
    }

    writeln!(writer, "    <div class=\"slider-group\">")?;
    writeln!(writer, "      <label for=\"{id}\">{label}</label>")?;
    writeln!(writer, "      <div class=\"slider-container\">")?;
    writeln!(
        writer,
        "        <input type=\"range\" id=\"{id}\"{bounds} class=\"slider\" data-metric=\"{card_id}\">"
    )?;
    writeln!(
        writer,
        "        <input type=\"number\" id=\"{id}-input\"{bounds} class=\"number-input\" data-metric=\"{card_id}\">"
    )?;
    writeln!(writer, "      </div>")?;
    writeln!(writer, "    </div>")?;
    Ok(())
}

fn write_result<W: Write>(writer: &mut W, result: &MetricResult) -> Result<()> {
    let id = html_escape(result.id().unwrap_or_default());
    let label = result.label().map_or_else(|| id.clone(), |label| html_escape(&label.to_string()));

    writeln!(writer, "    <div class=\"result-item\">")?;
    writeln!(writer, "      <div class=\"result-value\" id=\"{id}\">Calculating...</div>")?;
    writeln!(writer, "      <div class=\"result-label\">{label}</div>")?;
    writeln!(writer, "      <div class=\"benchmark\" id=\"{id}-benchmark\">Calculating...</div>")?;
    writeln!(writer, "    </div>")?;
    Ok(())
}

fn attribute(value: &RawValue) -> String {
    html_escape(&value.to_string())
}

fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
