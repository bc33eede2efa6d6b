use anyhow::{anyhow, Context, Result};
use clap::{Args, ValueEnum};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use modal_dialogs::config::Config;
use modal_dialogs::dialogs::{ConfirmDialog, Dialog, DialogHost, ResultDialog};
use modal_dialogs::focus::{mount, FocusManager, FocusState, Node};

/// How the scripted user answers the dialog
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Answer {
    /// Press "Yes"
    Yes,
    /// Press "No"
    No,
    /// Press Escape
    Dismiss,
}

/// Show a confirmation dialog and answer it from a script
#[derive(Args)]
pub struct DemoCommand {
    /// Question shown in the dialog
    #[arg(short = 'q', long = "question", default_value = "Discard unsaved changes?")]
    pub question: String,

    /// Answer to give
    #[arg(short = 'a', long = "answer", value_enum, default_value_t = Answer::Yes)]
    pub answer: Answer,

    /// Lock the dialog for the first answer so it gets refused
    #[arg(long = "lock-once")]
    pub lock_once: bool,
}

impl DemoCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        debug!("Executing demo command");

        let focus = Arc::new(FocusState::new());
        let host = Arc::new(DialogHost::new(focus.clone()).with_config(config));

        let editor = Node::new("editor").focusable(true).into_ref();
        let workspace = Node::new("workspace")
            .with_children([Node::new("status bar").into_ref(), Arc::clone(&editor)])
            .into_ref();
        mount(&workspace);
        if !focus.focus(&editor) {
            return Err(anyhow!("Background editor could not take focus"));
        }

        let dialog = Arc::new(ConfirmDialog::new(host.clone(), self.question.clone()));
        info!("Showing dialog {}", dialog.id());
        let pending = tokio::spawn(Arc::clone(&dialog).show_async());

        tokio::time::timeout(Duration::from_secs(5), host.opened(dialog.id()))
            .await
            .context("Dialog was never shown")?;
        host.pump();

        println!("Question: {}", dialog.question());
        println!("Focus while open: {}", focused_name(focus.as_ref()));

        if self.lock_once {
            dialog.lock();
            self.respond(&host, &dialog);
            println!(
                "Answer refused while locked: {}",
                host.is_open(dialog.id())
            );
            dialog.unlock();
        }

        self.respond(&host, &dialog);
        if host.is_open(dialog.id()) {
            warn!("Dialog is still open after answering; closing it");
            dialog.close();
        }

        let result = pending.await.context("Dialog task failed")??;
        match result {
            Some(true) => println!("Answer: yes"),
            Some(false) => println!("Answer: no"),
            None => println!("Answer: none (dismissed)"),
        }
        println!("Focus after close: {}", focused_name(focus.as_ref()));

        Ok(())
    }

    fn respond(&self, host: &DialogHost, dialog: &ConfirmDialog) {
        let outcome = match self.answer {
            Answer::Yes => Some(dialog.confirm()),
            Answer::No => Some(dialog.decline()),
            Answer::Dismiss => {
                host.handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
                None
            }
        };
        debug!("Answered {:?}: {:?}", self.answer, outcome);
    }
}

fn focused_name(focus: &dyn FocusManager) -> String {
    focus
        .focused_element()
        .map(|element| element.name().to_string())
        .unwrap_or_else(|| "nothing".to_string())
}
