use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use uuid::Uuid;

use crate::ai::session::{ImageFile, Session, SessionBuilder, SessionError, SessionUpdate};
use crate::catalog::Language;
use crate::chat::save_transcript;
use crate::core::db::ready_db;
use crate::core::{AppConfig, i18n};
use crate::gemini::GeminiClient;
use crate::store::{AppContext, KvStore};

const HELP: &str = "Commands: /image <path>, /clear-image, /mic, /quit";

fn print_last_reply(session: &Session) {
    if let Some(msg) = session.transcript().last() {
        println!("{}", msg.text());
    }
}

/// Wait for the outstanding reply and print it.
async fn await_reply(session: &mut Session) {
    while let Some(update) = session.next_update().await {
        match update {
            SessionUpdate::ReplyReceived(_) => {
                print_last_reply(session);
                break;
            }
            SessionUpdate::ReplyFailed { error, .. } => {
                tracing::debug!("{}", error);
                print_last_reply(session);
                break;
            }
            SessionUpdate::DraftChanged | SessionUpdate::DictationStopped => {}
        }
    }
}

fn attach(session: &mut Session, path: &str) {
    let image = match ImageFile::from_path(Path::new(path)) {
        Ok(image) => image,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    match session.attach_image(image) {
        Ok(()) => println!("Attached {}", path),
        Err(SessionError::AttachmentTooLarge { .. }) => {
            println!("{}", i18n::t(session.language(), i18n::IMAGE_UPLOAD_ERROR))
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn toggle_mic(session: &mut Session) {
    let already_reported = session.speech_unsupported_reported();
    match session.toggle_dictation() {
        Ok(true) => println!("Listening..."),
        Ok(false) => println!("Stopped listening"),
        Err(SessionError::SpeechUnsupported) => {
            if !already_reported {
                println!("{}", i18n::t(session.language(), i18n::SPEECH_UNSUPPORTED));
            }
        }
        Err(e) => println!("Error: {}", e),
    }
}

pub async fn run(config: AppConfig, language: Option<Language>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let db = ready_db(&config.db_path).await?;
    let context = AppContext::load(KvStore::new(&db)).await;
    let language = language.unwrap_or(context.language());

    let assistant = Arc::new(GeminiClient::new(
        &config.llm_api_hostname,
        &config.llm_api_key,
        &config.llm_model,
    ));
    let mut session = SessionBuilder::new(assistant)
        .language(language)
        .system_instruction(&config.system_message)
        .build();
    let session_id = Uuid::new_v4().to_string();

    print_last_reply(&session);
    println!("{}", HELP);

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                match line.split_once(' ').unwrap_or((line, "")) {
                    ("/quit", _) => break,
                    ("/image", path) => attach(&mut session, path.trim()),
                    ("/clear-image", _) => session.clear_attachment(),
                    ("/mic", _) => toggle_mic(&mut session),
                    ("/help", _) => println!("{}", HELP),
                    _ => {
                        if !line.is_empty() {
                            session.set_draft_text(line);
                        }
                        match session.send() {
                            Ok(_) => await_reply(&mut session).await,
                            Err(e) => tracing::debug!("{}", e),
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    session.close();
    let saved = save_transcript(&db, &session_id, session.transcript().messages()).await?;
    tracing::debug!("Saved {} messages for session {}", saved, session_id);

    Ok(())
}
