use std::path::PathBuf;
use std::process::ExitCode;

use scene_editor_lib::command::execute_json_batch;
use scene_editor_lib::state::EditorSettings;
use scene_editor_lib::SceneEditor;

/// Command-line arguments
#[derive(Debug, Default)]
struct Args {
    scene: Option<PathBuf>,
    commands: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_editor=info".into()),
        )
        .init();

    let args = parse_args();
    let settings = EditorSettings::load();
    let mut editor = SceneEditor::new(settings);
    if let Some(path) = EditorSettings::autosave_path() {
        editor = editor.with_autosave_path(path);
    }

    if let Some(path) = &args.scene {
        match editor.load_from_path(path) {
            Ok(report) => {
                tracing::info!("Loaded scene from {}: {}", path.display(), report.summary())
            }
            Err(e) => {
                tracing::error!("Failed to load scene {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(path) = &args.commands {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to read command file {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        };
        match execute_json_batch(&mut editor, &json) {
            Ok(responses) => {
                for response in &responses {
                    match serde_json::to_string(response) {
                        Ok(line) => println!("{line}"),
                        Err(e) => tracing::error!("Failed to encode response: {e}"),
                    }
                }
            }
            Err(e) => {
                tracing::error!("{e}");
                return ExitCode::FAILURE;
            }
        }
    }

    match &args.output {
        Some(path) => {
            if let Err(e) = editor.save_to_path(path) {
                tracing::error!("Failed to save scene to {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
        None if args.commands.is_none() => match editor.export_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!("Failed to export scene: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => {}
    }

    ExitCode::SUCCESS
}

/// Parse `--scene <path>`, `--commands <path>` and `--output <path>`
fn parse_args() -> Args {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        let slot = match arg.as_str() {
            "--scene" => &mut args.scene,
            "--commands" => &mut args.commands,
            "--output" => &mut args.output,
            other => {
                tracing::warn!("Ignoring unknown argument {other}");
                continue;
            }
        };
        match iter.next() {
            Some(value) => *slot = Some(PathBuf::from(value)),
            None => tracing::warn!("Missing value for {arg}"),
        }
    }
    args
}
