use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::cli::{NoteCommand, NoteSubcommand};
use crate::util::short_id;
use crate::views::table::display_notes;

pub async fn note_command(app: &App, command: NoteCommand) -> Result<()> {
    match command.command {
        NoteSubcommand::Add(add) => {
            let note = app.planner.add_note(&add.title, &add.content).await?;
            println!(
                "{} Saved note {}, ID {}",
                "✓".green().bold(),
                note.title.bold(),
                short_id(&note.id).yellow()
            );
        }
        NoteSubcommand::List => display_notes(&app.planner.notes().await?),
        NoteSubcommand::Edit(edit) => {
            let note = app.planner.resolve_note(&edit.id).await?;
            if edit.title.is_none() && edit.content.is_none() {
                println!("Nothing to change. Pass --title and/or --content.");
                return Ok(());
            }
            let note = app.planner.update_note(note.id, edit.title, edit.content).await?;
            println!("{} Updated note {}", "✓".green().bold(), note.title.bold());
        }
        NoteSubcommand::Delete(delete) => {
            let note = app.planner.resolve_note(&delete.id).await?;
            if !delete.force {
                let confirmation = Confirm::new()
                    .with_prompt(format!("Delete note '{}'?", note.title))
                    .default(false)
                    .interact()
                    .unwrap_or(false);
                if !confirmation {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }
            let note = app.planner.delete_note(note.id).await?;
            println!("{} Deleted note {}", "✓".green().bold(), note.title);
        }
    }
    Ok(())
}
