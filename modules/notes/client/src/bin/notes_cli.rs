//! notes-cli: drive the notes client from a terminal.
//!
//! Usage:
//!   notes-cli list
//!   notes-cli add <markdown> [tag]
//!   notes-cli delete <id>
//!   notes-cli search <query>
//!   notes-cli export [json|markdown]
//!   notes-cli theme [toggle]
//!
//! Every command loads first. When the service is down the local cache is
//! used and the command still succeeds.

use notes_client::{
    ClientConfig, ClientState, ExportFormat, HttpNoteBackend, LocalCache, SyncController,
    export_notes,
};
use notes_types::{Note, NoteId};

const USAGE: &str = "usage: notes-cli <list|add|delete|search|export|theme> [args...]";

fn print_notes<'a>(notes: impl IntoIterator<Item = &'a Note>) {
    for note in notes {
        let title = note.markdown.lines().next().unwrap_or("").trim();
        match note.tag_str() {
            "" => println!("{}  {}  {}", note.id, note.timestamp, title),
            tag => println!("{}  {}  {}  [{}]", note.id, note.timestamp, title, tag),
        }
    }
}

fn print_status(state: &mut ClientState) {
    if let Some(notice) = state.take_notice() {
        eprintln!("{}", notice);
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    let config = ClientConfig::from_env();
    log::debug!("Using notes service at {}", config.api_url);

    let controller = SyncController::new(
        HttpNoteBackend::new(&config.api_url, config.request_timeout),
        LocalCache::new(&config.cache_dir),
    );
    let mut state = controller.restore_session();
    controller.load_notes(&mut state).await;

    match command {
        "list" => {
            print_status(&mut state);
            print_notes(&state.notes);
        }
        "add" => {
            let Some(markdown) = args.get(1) else {
                eprintln!("usage: notes-cli add <markdown> [tag]");
                std::process::exit(2);
            };
            state.new_note();
            state.editor.markdown = markdown.clone();
            state.editor.tag = args.get(2).cloned().unwrap_or_default();
            controller.save_note(&mut state).await;
            print_status(&mut state);
        }
        "delete" => {
            let Some(id) = args.get(1).and_then(|s| s.parse::<u64>().ok()) else {
                eprintln!("usage: notes-cli delete <id>");
                std::process::exit(2);
            };
            controller.delete_note(&mut state, NoteId(id)).await;
            print_status(&mut state);
        }
        "search" => {
            print_status(&mut state);
            state.set_search_query(args[1..].join(" "));
            print_notes(state.visible_notes());
        }
        "export" => {
            let format = match args.get(1).map(|s| s.parse::<ExportFormat>()) {
                None => ExportFormat::default(),
                Some(Ok(f)) => f,
                Some(Err(e)) => {
                    eprintln!("{}", e);
                    std::process::exit(2);
                }
            };
            print_status(&mut state);
            println!("{}", export_notes(&state.notes, format));
        }
        "theme" => {
            if args.get(1).map(String::as_str) == Some("toggle") {
                controller.toggle_theme(&mut state);
            }
            println!("{}", state.theme);
        }
        other => {
            eprintln!("unknown command: {}\n{}", other, USAGE);
            std::process::exit(2);
        }
    }
}
