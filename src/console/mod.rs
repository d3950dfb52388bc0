//! Console front end - a line-oriented command loop over a [`ShipmentDesk`].
//!
//! Store failures are printed and the loop carries on with the form intact;
//! only I/O errors on the console itself end the session.

/// Command parsing
pub mod command;
/// Text rendering of desk state
pub mod render;

use crate::config::Catalog;
use crate::core::desk::{ConfirmGate, DeleteOutcome, ShipmentDesk};
use crate::core::fields::field;
use crate::errors::Result;
use async_trait::async_trait;
use command::{Command, HELP};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use std::time::Duration;
use tracing::{debug, warn};

/// How long a save may take before the console says it is still working.
const PROGRESS_NOTICE_AFTER: Duration = Duration::from_millis(150);

/// Asks a yes/no question on the console.
struct LinePrompt<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

#[async_trait]
impl<R, W> ConfirmGate for LinePrompt<'_, R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn confirm(&mut self, prompt: &str) -> bool {
        let asked = async {
            self.output.write_all(format!("{prompt} [s/N] ").as_bytes()).await?;
            self.output.flush().await?;
            let mut answer = String::new();
            self.input.read_line(&mut answer).await?;
            Ok::<_, std::io::Error>(answer)
        };
        match asked.await {
            Ok(answer) => matches!(
                answer.trim().to_lowercase().as_str(),
                "s" | "si" | "sí" | "y" | "yes"
            ),
            Err(e) => {
                warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

/// Interactive session over one desk.
pub struct Console<R, W> {
    desk: ShipmentDesk,
    catalog: Catalog,
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Wraps `desk` with the given input and output.
    pub fn new(desk: ShipmentDesk, catalog: Catalog, input: R, output: W) -> Self {
        Self {
            desk,
            catalog,
            input,
            output,
        }
    }

    /// Gives the desk back, e.g. to close it.
    pub fn into_desk(self) -> ShipmentDesk {
        self.desk
    }

    async fn print(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        if !text.ends_with('\n') {
            self.output.write_all(b"\n").await?;
        }
        self.output.flush().await?;
        Ok(())
    }

    /// Reads and executes commands until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        self.print("HF System - escriba 'help' para ver los comandos").await?;
        let mut line = String::new();
        loop {
            self.output.write_all(b"hf> ").await?;
            self.output.flush().await?;

            line.clear();
            if self.input.read_line(&mut line).await? == 0 {
                debug!("Console input closed");
                break;
            }
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command).await?,
                Err(message) if message.is_empty() => {}
                Err(message) => self.print(&message).await?,
            }
        }
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> Result<()> {
        let module = self.desk.view().active_module;
        let module_independent = matches!(
            command,
            Command::Help | Command::Modules | Command::Module(_) | Command::Sidebar
        );
        if let (false, Some(placeholder)) = (module_independent, module.placeholder()) {
            return self.print(placeholder).await;
        }

        match command {
            Command::Help => self.print(HELP).await,
            Command::Modules => {
                let text = render::sidebar(self.desk.view(), self.desk.is_live());
                self.print(&text).await
            }
            Command::Module(module) => {
                self.desk.view_mut().select_module(module);
                let text = module.placeholder().map_or_else(|| module.to_string(), str::to_string);
                self.print(&text).await
            }
            Command::Tab(tab) => {
                self.desk.view_mut().select_tab(tab);
                self.show_fields().await
            }
            Command::Fields => self.show_fields().await,
            Command::Options(name) => {
                let text = field(&name).map_or_else(
                    || format!("unknown field '{name}'"),
                    |spec| render::field_options(spec, &self.catalog),
                );
                self.print(&text).await
            }
            Command::Set { field: name, value } => {
                if self.desk.update_field(&name, &value) {
                    let text = render::summary_strip(&self.desk.summary());
                    self.print(&text).await
                } else {
                    self.print(&format!("'{name}' is not an editable field")).await
                }
            }
            Command::Show => self.show_form().await,
            Command::Summary => {
                let text = render::summary_strip(&self.desk.summary());
                self.print(&text).await
            }
            Command::List => self.show_records().await,
            Command::Edit(id) => match self.desk.edit(id).await {
                Ok(()) => self.show_form().await,
                Err(e) => self.print(&e.to_string()).await,
            },
            Command::Cancel => {
                self.desk.cancel_edit();
                self.print("Edición cancelada").await
            }
            Command::Save => self.save().await,
            Command::Delete(id) => self.delete(id).await,
            Command::Collapse => {
                self.desk.view_mut().toggle_form();
                let text = render::tab_bar(self.desk.view());
                self.print(&text).await
            }
            Command::Sidebar => {
                self.desk.view_mut().toggle_sidebar();
                let text = render::sidebar(self.desk.view(), self.desk.is_live());
                self.print(&text).await
            }
            Command::Quit => Ok(()),
        }
    }

    async fn show_fields(&mut self) -> Result<()> {
        let view = self.desk.view();
        let mut text = render::tab_bar(view);
        if !view.form_collapsed {
            text.push('\n');
            text.push_str(&render::form_fields(
                view.active_tab,
                self.desk.form().form(),
                &self.desk.summary(),
            ));
        }
        self.print(&text).await
    }

    async fn show_form(&mut self) -> Result<()> {
        let mut text = String::new();
        if let Some(id) = self.desk.edit_target().id() {
            text.push_str(&format!("Editando embarque {id}\n"));
        }
        text.push_str(&render::summary_strip(&self.desk.summary()));
        text.push('\n');
        text.push_str(render::submit_label(self.desk.edit_target()));
        self.print(&text).await?;
        self.show_fields().await
    }

    async fn show_records(&mut self) -> Result<()> {
        let rows = self.desk.rows().await;
        self.print(&render::records_table(&rows)).await
    }

    async fn save(&mut self) -> Result<()> {
        let busy = self.desk.busy_handle();
        let result = {
            let submit = self.desk.submit();
            tokio::pin!(submit);
            tokio::select! {
                result = &mut submit => result,
                () = tokio::time::sleep(PROGRESS_NOTICE_AFTER) => {
                    if busy.is_busy() {
                        let notice = format!("{}\n", render::PROCESSING_LABEL);
                        self.output.write_all(notice.as_bytes()).await?;
                        self.output.flush().await?;
                    }
                    submit.await
                }
            }
        };
        match result {
            Ok(outcome) => {
                self.print(&outcome.to_string()).await?;
                self.show_records().await
            }
            Err(e) => {
                warn!("Save failed: {}", e);
                self.print(&format!("Error: {e}")).await
            }
        }
    }

    async fn delete(&mut self, id: i64) -> Result<()> {
        let mut gate = LinePrompt {
            input: &mut self.input,
            output: &mut self.output,
        };
        match self.desk.delete(id, &mut gate).await {
            Ok(DeleteOutcome::Deleted(_)) => self.show_records().await,
            Ok(DeleteOutcome::Declined) => Ok(()),
            Err(e) => {
                warn!("Delete failed: {}", e);
                self.print(&e.to_string()).await
            }
        }
    }
}

/// Runs a console on stdin/stdout and returns the desk when the user quits.
pub async fn run_stdio(desk: ShipmentDesk, catalog: Catalog) -> Result<ShipmentDesk> {
    let mut console: Console<BufReader<Stdin>, Stdout> =
        Console::new(desk, catalog, BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    console.run().await?;
    Ok(console.into_desk())
}
