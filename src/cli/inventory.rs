//! Inventory command - interactive model list on the terminal

use std::sync::Arc;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::inventory::{EditError, ViewUpdate};
use crate::app::{InventoryView, ListController, ListState, OptionsCache};
use crate::domain::{
    FormField, ModelId, ModelRecord, ModelRegistryClient, OptionCategory, SortDirection,
    SortField,
};

#[derive(Args, Clone, Default)]
pub struct InventoryArgs {
    /// Initial search term
    #[arg(long)]
    pub search: Option<String>,

    /// Initial sort column, e.g. modelName or createdAt
    #[arg(long)]
    pub sort: Option<SortField>,

    /// Print the list once and exit
    #[arg(long)]
    pub once: bool,
}

const HELP: &str = "Commands: search <term> | sort <column> | refresh | edit <id> | \
set <field> <value> | save | cancel | show | help | quit";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Search(String),
    Sort(SortField),
    Refresh,
    Edit(ModelId),
    Set(FormField, String),
    Save,
    Cancel,
    Show,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(c, r)| (c, r.trim()))
        .unwrap_or((line, ""));

    match command.to_lowercase().as_str() {
        "search" | "/" => Ok(Input::Search(rest.to_string())),
        "sort" => rest.parse().map(Input::Sort),
        "refresh" | "r" => Ok(Input::Refresh),
        "edit" | "e" => rest
            .parse::<ModelId>()
            .map(Input::Edit)
            .map_err(|_| format!("Invalid model ID '{}'", rest)),
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Ok(Input::Set(field.parse()?, value.trim().to_string()))
        }
        "save" => Ok(Input::Save),
        "cancel" => Ok(Input::Cancel),
        "show" | "ls" | "" => Ok(Input::Show),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" | "q" => Ok(Input::Quit),
        other => Err(format!("Unknown command '{}'. {}", other, HELP)),
    }
}

pub async fn run(client: Arc<dyn ModelRegistryClient>, args: InventoryArgs) -> anyhow::Result<()> {
    let mut view = InventoryView::new(client);

    view.activate();
    if let Some(term) = args.search {
        view.search(term);
    }
    if let Some(field) = args.sort {
        view.sort(field);
    }
    view.settle().await;
    println!("{}", render(view.controller()));

    if args.once {
        return Ok(());
    }

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                match parse_input(&line) {
                    Ok(Input::Quit) => break,
                    Ok(input) => dispatch(&mut view, input),
                    Err(message) => println!("{}", message),
                }
            }
            Some(completion) = view.next_completion(), if !view.is_idle() => {
                match view.handle(completion) {
                    ViewUpdate::List { applied: true } => println!("{}", render(view.controller())),
                    ViewUpdate::List { applied: false } | ViewUpdate::Options { .. } => {}
                    ViewUpdate::Saved(Ok(record)) => {
                        println!("Model '{} {}' updated", record.name(), record.version());
                    }
                    ViewUpdate::Saved(Err(err)) => {
                        println!("{}", err);
                        if let Some(session) = view.controller().edit_session() {
                            println!("{}", render_edit(view.controller(), session.target()));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn dispatch(view: &mut InventoryView, input: Input) {
    match input {
        Input::Search(term) => view.search(term),
        Input::Sort(field) => view.sort(field),
        Input::Refresh => view.refresh(),
        Input::Edit(id) => {
            if view.controller_mut().start_edit_by_id(id).is_some() {
                println!("{}", render_edit(view.controller(), id));
            } else {
                println!("Model {} is not in the current list", id);
            }
        }
        Input::Set(field, value) => match view.controller_mut().edit_session_mut() {
            Some(session) => {
                session.set(field, value);
                if let Some(message) = session.field_error(field) {
                    println!("  {}", message);
                }
            }
            None => println!("{}", EditError::NoSession),
        },
        Input::Save => match view.save() {
            Ok(()) => println!("Saving..."),
            Err(EditError::Validation(_)) => {
                if let Some(session) = view.controller().edit_session() {
                    println!("{}", render_edit(view.controller(), session.target()));
                }
            }
            Err(err) => println!("{}", err),
        },
        Input::Cancel => {
            view.controller_mut().cancel_edit();
            println!("Edit cancelled");
        }
        Input::Show => println!("{}", render(view.controller())),
        Input::Help => println!("{}", HELP),
        Input::Quit => {}
    }
}

const COLUMNS: [(SortField, &str); 9] = [
    (SortField::Id, "ID"),
    (SortField::Name, "Model Name"),
    (SortField::Version, "Version"),
    (SortField::Sponsor, "Sponsor"),
    (SortField::BusinessLine, "Business Line"),
    (SortField::ModelType, "Model Type"),
    (SortField::RiskRating, "Risk Rating"),
    (SortField::Status, "Status"),
    (SortField::UpdatedAt, "Last Updated"),
];

/// Label sent with the record, else the cached option label
fn label(
    record_label: Option<&str>,
    options: &OptionsCache,
    category: OptionCategory,
    code: &str,
) -> String {
    record_label
        .map(str::to_string)
        .unwrap_or_else(|| options.label(category, code))
}

fn row(record: &ModelRecord, options: &OptionsCache) -> Vec<String> {
    let labels = record.labels();

    vec![
        record.id().to_string(),
        record.name().to_string(),
        record.version().to_string(),
        record.sponsor().to_string(),
        label(
            labels.business_line_display_name.as_deref(),
            options,
            OptionCategory::BusinessLines,
            record.business_line().code(),
        ),
        label(
            labels.model_type_display_name.as_deref(),
            options,
            OptionCategory::ModelTypes,
            record.model_type().code(),
        ),
        label(
            labels.risk_rating_display_name.as_deref(),
            options,
            OptionCategory::RiskRatings,
            record.risk_rating().code(),
        ),
        label(
            labels.status_display_name.as_deref(),
            options,
            OptionCategory::Statuses,
            record.status().code(),
        ),
        record.updated_at().format("%Y-%m-%d %H:%M").to_string(),
    ]
}

/// The list as a plain-text table, or the loading/error/empty notice
fn render(controller: &ListController) -> String {
    match controller.state() {
        ListState::Loading => return "Loading models...".to_string(),
        ListState::Error(message) => return message.clone(),
        ListState::Ready => {}
    }

    if controller.models().is_empty() {
        return "No models found.".to_string();
    }

    let query = controller.query();
    let header: Vec<String> = COLUMNS
        .iter()
        .map(|(field, title)| match query.sort() {
            Some(sort) if sort.field == *field => match sort.direction {
                SortDirection::Asc => format!("{} ^", title),
                SortDirection::Desc => format!("{} v", title),
            },
            _ => title.to_string(),
        })
        .collect();

    let rows: Vec<Vec<String>> = controller
        .models()
        .iter()
        .map(|record| row(record, controller.options()))
        .collect();

    let widths: Vec<usize> = (0..COLUMNS.len())
        .map(|i| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 3);
    if !query.search_term().trim().is_empty() {
        lines.push(format!("Search: {}", query.search_term().trim()));
    }
    lines.push(format_line(&header));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(rows.iter().map(|r| format_line(r)));

    lines.join("\n")
}

/// The open edit session's working copy with field errors
fn render_edit(controller: &ListController, id: ModelId) -> String {
    let Some(session) = controller
        .edit_session()
        .filter(|session| session.target() == id)
    else {
        return format!("Model {} is not being edited", id);
    };

    let mut lines = vec![format!("Editing model {}", id)];
    for field in FormField::ALL {
        let mut line = format!("  {:<14} {}", field.label(), session.draft().get(field));
        if let Some(message) = session.field_error(field) {
            line.push_str(&format!("  <- {}", message));
        }
        lines.push(line);
    }
    if let Some(message) = session.error_message() {
        lines.push(message.to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::inventory::LOAD_FAILED_MESSAGE;
    use crate::domain::model::fixtures::{market_model_fields, pd_model_fields};
    use crate::domain::RemoteError;
    use crate::infrastructure::InMemoryModelRegistry;

    fn seeded() -> Arc<InMemoryModelRegistry> {
        Arc::new(
            InMemoryModelRegistry::new()
                .with_models(vec![pd_model_fields(), market_model_fields()]),
        )
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(
            parse_input("search credit risk"),
            Ok(Input::Search("credit risk".into()))
        );
        assert_eq!(parse_input("search"), Ok(Input::Search(String::new())));
        assert_eq!(parse_input("sort modelName"), Ok(Input::Sort(SortField::Name)));
        assert_eq!(parse_input("edit 3"), Ok(Input::Edit(ModelId::new(3).unwrap())));
        assert_eq!(
            parse_input("set sponsor Model Risk Office"),
            Ok(Input::Set(FormField::Sponsor, "Model Risk Office".into()))
        );
        assert_eq!(parse_input("set version"), Ok(Input::Set(FormField::Version, String::new())));
        assert_eq!(parse_input("QUIT"), Ok(Input::Quit));
    }

    #[test]
    fn test_parse_input_errors() {
        assert!(parse_input("edit 0").is_err());
        assert!(parse_input("edit abc").is_err());
        assert!(parse_input("sort nothing").is_err());
        assert!(parse_input("dance").is_err());
    }

    #[tokio::test]
    async fn test_render_table_with_sort_marker() {
        let mut controller = ListController::new(seeded());
        controller.activate().await;
        let request = controller.change_sort(SortField::Name);
        controller.run(request).await;

        let output = render(&controller);
        let lines: Vec<_> = output.lines().collect();

        assert!(lines[0].contains("Model Name ^"));
        assert!(lines[2].contains("PD Model"));
        assert!(lines[2].contains("Retail Banking"));
        assert!(lines[3].contains("VaR Engine"));
        assert!(lines[3].contains("Investment Banking"));
    }

    #[tokio::test]
    async fn test_render_notices() {
        let mut controller = ListController::new(seeded());
        assert_eq!(render(&controller), "Loading models...");

        let request = controller.change_search_term("no such model");
        controller.run(request).await;
        assert_eq!(render(&controller), "No models found.");

        let request = controller.refresh();
        controller.apply(crate::app::inventory::QueryOutcome {
            seq: request.seq(),
            result: Err(RemoteError::new("down")),
        });
        assert_eq!(render(&controller), LOAD_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_render_edit_shows_field_errors() {
        let mut controller = ListController::new(seeded());
        controller.activate().await;
        let id = ModelId::new(1).unwrap();
        controller.start_edit_by_id(id).unwrap().set(FormField::Name, "");

        let output = render_edit(&controller, id);

        assert!(output.starts_with("Editing model 1"));
        assert!(output.contains("Model Name is required"));
        assert!(output.contains("Risk Team"));
    }
}
