//! Line-oriented front end: command parsing and a stdout view.

use anyhow::{anyhow, bail, Context, Result};
use skylog_services::{CurrentWeather, ExportFormat, Forecast, RecordId};
use skylog_ui::{
    dropdown_status, Dropdown, DropdownContent, FieldId, FormCoordinator, HistoryRow, Notice,
    PanelState, RecordDetails, UpdateDraft, View,
};

pub const HELP: &str = "\
Commands:
  type <field> <text>          edit a location field (fields: location, current-location)
  focus <field> | blur <field> show or hide the field's suggestions
  pick <field> <n>             choose suggestion n
  current [text]               current weather and forecast for the current-location field
  gps <lat> <lon>              current weather for a device position
  gps-error <message>          report that the position could not be determined
  save <start> <end> [text]    save weather history for the location field (dates YYYY-MM-DD)
  history                      reload the history list
  edit <id>                    open a record for editing
  update <id> <start> <end> <location>
  close                        close the edit form
  delete <id> | details <id>
  clear [yes]                  delete all history, asks for confirmation
  export <json|csv|markdown>
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Type { field: FieldId, text: String },
    Focus(FieldId),
    Blur(FieldId),
    Pick { field: FieldId, index: usize },
    Current(Option<String>),
    Gps { latitude: f64, longitude: f64 },
    GpsError(String),
    Save { start: String, end: String, location: Option<String> },
    History,
    Edit(RecordId),
    Update { id: RecordId, start: String, end: String, location: String },
    Close,
    Delete(RecordId),
    Details(RecordId),
    Clear { confirmed: bool },
    Export(ExportFormat),
    Help,
    Quit,
}

/// Split off the first whitespace-delimited word; the remainder keeps its inner spacing.
fn next_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (input, ""),
    }
}

fn field(name: &str) -> Result<FieldId> {
    FieldId::parse(name).ok_or_else(|| anyhow!("Unknown field: {}", name))
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.is_empty() {
        bail!("Missing {}", what);
    }
    Ok(value)
}

fn optional_text(rest: &str) -> Option<String> {
    let text = rest.trim_start();
    (!text.is_empty()).then(|| text.to_string())
}

pub fn parse_command(line: &str) -> Result<Command> {
    let (name, rest) = next_word(line);

    let command = match name {
        "type" => {
            let (f, text) = next_word(rest);
            Command::Type {
                field: field(required(f, "field")?)?,
                text: text.to_string(),
            }
        }
        "focus" => Command::Focus(field(required(rest.trim(), "field")?)?),
        "blur" => Command::Blur(field(required(rest.trim(), "field")?)?),
        "pick" => {
            let (f, n) = next_word(rest);
            let n: usize = required(n.trim(), "suggestion number")?
                .parse()
                .context("Suggestion number must be a positive integer")?;
            if n == 0 {
                bail!("Suggestions are numbered from 1");
            }
            Command::Pick {
                field: field(required(f, "field")?)?,
                index: n - 1,
            }
        }
        "current" => Command::Current(optional_text(rest)),
        "gps" => {
            let (lat, rest) = next_word(rest);
            let (lon, _) = next_word(rest);
            Command::Gps {
                latitude: required(lat, "latitude")?.parse().context("Invalid latitude")?,
                longitude: required(lon, "longitude")?.parse().context("Invalid longitude")?,
            }
        }
        "gps-error" => Command::GpsError(required(rest.trim(), "message")?.to_string()),
        "save" => {
            let (start, rest) = next_word(rest);
            let (end, rest) = next_word(rest);
            Command::Save {
                start: required(start, "start date")?.to_string(),
                end: required(end, "end date")?.to_string(),
                location: optional_text(rest),
            }
        }
        "history" => Command::History,
        "edit" => Command::Edit(RecordId::new(required(rest.trim(), "record id")?)),
        "update" => {
            let (id, rest) = next_word(rest);
            let (start, rest) = next_word(rest);
            let (end, rest) = next_word(rest);
            Command::Update {
                id: RecordId::new(required(id, "record id")?),
                start: required(start, "start date")?.to_string(),
                end: required(end, "end date")?.to_string(),
                location: rest.trim_start().to_string(),
            }
        }
        "close" => Command::Close,
        "delete" => Command::Delete(RecordId::new(required(rest.trim(), "record id")?)),
        "details" => Command::Details(RecordId::new(required(rest.trim(), "record id")?)),
        "clear" => Command::Clear {
            confirmed: matches!(rest.trim(), "yes" | "y"),
        },
        "export" => Command::Export(
            required(rest.trim(), "format")?
                .parse()
                .map_err(|e: String| anyhow!(e))?,
        ),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("Unknown command: {} (try 'help')", other),
    };

    Ok(command)
}

/// Feed a parsed command to the coordinator.
pub fn apply(coordinator: &mut FormCoordinator, command: Command) {
    match command {
        Command::Type { field, text } => coordinator.on_input(&field, &text),
        Command::Focus(field) => coordinator.on_focus(&field),
        Command::Blur(field) => coordinator.on_outside_click(&field),
        Command::Pick { field, index } => {
            if !coordinator.pick_suggestion(&field, index) {
                println!("No suggestion {} for {}", index + 1, field);
            }
        }
        Command::Current(text) => {
            if let Some(text) = text {
                coordinator.on_input(&FieldId::CURRENT, &text);
            }
            coordinator.submit_current();
        }
        Command::Gps {
            latitude,
            longitude,
        } => {
            coordinator.begin_device_location();
            coordinator.on_device_location(Ok((latitude, longitude)));
        }
        Command::GpsError(message) => {
            coordinator.begin_device_location();
            coordinator.on_device_location(Err(message));
        }
        Command::Save {
            start,
            end,
            location,
        } => {
            if let Some(location) = location {
                coordinator.on_input(&FieldId::HISTORY, &location);
            }
            coordinator.submit_history(&start, &end);
        }
        Command::History => coordinator.refresh_history(),
        Command::Edit(id) => {
            if !coordinator.open_update_modal(&id) {
                println!("No record {}", id);
            }
        }
        Command::Update {
            id,
            start,
            end,
            location,
        } => {
            let editing = coordinator.update_modal().is_some_and(|d| d.id == id);
            if editing || coordinator.open_update_modal(&id) {
                coordinator.submit_update(&location, &start, &end);
            } else {
                println!("No record {}", id);
            }
        }
        Command::Close => coordinator.close_update_modal(),
        Command::Delete(id) => coordinator.delete_record(&id),
        Command::Details(id) => {
            if !coordinator.show_details(&id) {
                println!("No record {}", id);
            }
        }
        Command::Clear { confirmed } => {
            if !coordinator.clear_history(confirmed) {
                println!("This deletes every record. Type 'clear yes' to confirm.");
            }
        }
        Command::Export(format) => {
            match coordinator.export_url(format) {
                Ok(url) => println!("Downloading {}", url),
                Err(e) => println!("{}", e),
            }
            coordinator.export(format);
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

fn temp(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}°C", v))
}

/// Prints every render call to stdout.
#[derive(Debug, Default)]
pub struct ConsoleView;

impl View for ConsoleView {
    fn render_dropdown(&mut self, field: &FieldId, dropdown: &Dropdown) {
        if !dropdown.visible {
            return;
        }
        if let Some(status) = dropdown_status(&dropdown.content) {
            println!("[{}] {}", field, status);
        }
        if let DropdownContent::Results(results) = &dropdown.content {
            for (i, s) in results.iter().enumerate() {
                println!("[{}] {}. {}", field, i + 1, s.display_name);
            }
        }
    }

    fn set_field_value(&mut self, field: &FieldId, value: &str) {
        println!("[{}] = {}", field, value);
    }

    fn show_result(&mut self, notice: &Notice) {
        if notice.is_error() {
            eprintln!("{}", notice.text);
        } else {
            println!("{}", notice.text);
        }
    }

    fn reset_history_form(&mut self) {}

    fn render_current(&mut self, state: &PanelState<CurrentWeather>) {
        match state {
            PanelState::Loading(msg) => println!("{}", msg),
            PanelState::Error(msg) => eprintln!("{}", msg),
            PanelState::Ready(w) => {
                println!("{} {}", w.weather_icon, w.location);
                println!(
                    "  {} (feels like {}), {}",
                    temp(w.temperature),
                    temp(w.feels_like),
                    w.weather_description
                );
                println!(
                    "  humidity {}%, wind {} km/h, pressure {} hPa",
                    w.humidity.unwrap_or_default(),
                    w.wind_speed.unwrap_or_default(),
                    w.pressure.unwrap_or_default()
                );
            }
        }
    }

    fn render_forecast(&mut self, state: &PanelState<Forecast>) {
        match state {
            PanelState::Loading(msg) => println!("{}", msg),
            PanelState::Error(msg) => eprintln!("{}", msg),
            PanelState::Ready(f) => {
                for day in &f.forecast {
                    println!(
                        "  {} {} {:.1}°C / {:.1}°C {} ({:.1}mm)",
                        day.date.format("%a %b %-d"),
                        day.weather_icon,
                        day.temp_max.unwrap_or_default(),
                        day.temp_min.unwrap_or_default(),
                        day.weather_description,
                        day.precipitation.unwrap_or_default()
                    );
                }
            }
        }
    }

    fn render_history(&mut self, rows: &[HistoryRow]) {
        if rows.is_empty() {
            println!("No saved records yet.");
            return;
        }
        for row in rows {
            println!(
                "{}  {}  {} to {}  {}",
                row.id,
                row.location,
                row.start_date,
                row.end_date,
                row.summary_text()
            );
        }
    }

    fn history_error(&mut self, message: &str) {
        eprintln!("{}", message);
    }

    fn open_update_modal(&mut self, draft: &UpdateDraft) {
        println!(
            "Editing {}: {} from {} to {}",
            draft.id, draft.location, draft.start_date, draft.end_date
        );
    }

    fn close_update_modal(&mut self) {}

    fn show_details(&mut self, details: &RecordDetails) {
        println!("Weather Details - {}", details.location);
        for (date, mean) in &details.entries {
            println!("  {}  {}", date.format("%b %-d, %Y"), temp(*mean));
        }
        if !details.maps_configured {
            println!("  (map embedding not configured)");
        }
    }

    fn export_ready(&mut self, _format: ExportFormat, body: &str) {
        println!("{}", body);
    }

    fn alert(&mut self, message: &str) {
        println!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_type_keeping_spaces() {
        assert_eq!(
            parse_command("type location  New York ").unwrap(),
            Command::Type {
                field: FieldId::HISTORY,
                text: " New York ".to_string()
            }
        );
    }

    #[test]
    fn parses_pick_as_zero_based() {
        assert_eq!(
            parse_command("pick current 2").unwrap(),
            Command::Pick {
                field: FieldId::CURRENT,
                index: 1
            }
        );
        assert!(parse_command("pick current 0").is_err());
    }

    #[test]
    fn parses_save_with_optional_location() {
        assert_eq!(
            parse_command("save 2024-03-01 2024-03-10").unwrap(),
            Command::Save {
                start: "2024-03-01".into(),
                end: "2024-03-10".into(),
                location: None
            }
        );
        assert_eq!(
            parse_command("save 2024-03-01 2024-03-10 Rio de Janeiro").unwrap(),
            Command::Save {
                start: "2024-03-01".into(),
                end: "2024-03-10".into(),
                location: Some("Rio de Janeiro".into())
            }
        );
    }

    #[test]
    fn parses_update() {
        assert_eq!(
            parse_command("update 5 2024-03-01 2024-03-02 Madrid, Spain").unwrap(),
            Command::Update {
                id: RecordId::from(5),
                start: "2024-03-01".into(),
                end: "2024-03-02".into(),
                location: "Madrid, Spain".into()
            }
        );
    }

    #[test]
    fn parses_gps_and_clear() {
        assert_eq!(
            parse_command("gps 51.5 -0.12").unwrap(),
            Command::Gps {
                latitude: 51.5,
                longitude: -0.12
            }
        );
        assert!(parse_command("gps north").is_err());
        assert_eq!(
            parse_command("clear").unwrap(),
            Command::Clear { confirmed: false }
        );
        assert_eq!(
            parse_command("clear yes").unwrap(),
            Command::Clear { confirmed: true }
        );
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(parse_command("teleport Paris").is_err());
        assert!(parse_command("type nowhere Paris").is_err());
        assert!(parse_command("export pdf").is_err());
        assert_eq!(
            parse_command("export md").unwrap(),
            Command::Export(ExportFormat::Markdown)
        );
    }
}
