//! Console command parsing.

use crate::core::fields::FormTab;
use crate::core::view::Module;
use std::str::FromStr;

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the commands
    Help,
    /// Show the sidebar
    Modules,
    /// Switch module
    Module(Module),
    /// Switch form tab
    Tab(FormTab),
    /// Show the active tab's fields
    Fields,
    /// Show the options for a selector field
    Options(String),
    /// Set a field; an empty value clears it
    Set {
        /// Column name
        field: String,
        /// Raw input, possibly empty
        value: String,
    },
    /// Summary strip, tabs and fields
    Show,
    /// Summary strip only
    Summary,
    /// Records table
    List,
    /// Load a record into the form
    Edit(i64),
    /// Drop the edit target
    Cancel,
    /// Submit the form
    Save,
    /// Delete a record after confirmation
    Delete(i64),
    /// Toggle the form body
    Collapse,
    /// Toggle the sidebar
    Sidebar,
    /// Leave the console
    Quit,
}

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  modules                 show the sidebar
  module <id>             switch module (embarques, programacion, logistica, cupos)
  tab <name>              switch form tab (comex, carga, financiero)
  fields                  show the fields of the active tab
  options <field>         list the options of a selector field
  set <field> [value]     set a field; no value clears it
  show                    summary, tabs and fields
  summary                 quick totals
  list                    recent records
  edit <id>               load a record into the form
  cancel                  stop editing and clear the form
  save                    save the form
  delete <id>             delete a record (asks for confirmation)
  collapse                collapse or expand the form
  sidebar                 collapse or expand the sidebar
  help                    this text
  quit                    leave";

fn parse_id(arg: &str) -> Result<i64, String> {
    arg.trim()
        .parse::<i64>()
        .map_err(|_| format!("'{}' is not a record id", arg.trim()))
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str, String> {
    let arg = arg.trim();
    if arg.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(arg)
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        match verb.to_lowercase().as_str() {
            "help" | "?" => Ok(Self::Help),
            "modules" => Ok(Self::Modules),
            "module" => required(rest, "module <id>")?.parse().map(Self::Module),
            "tab" => required(rest, "tab <name>")?.parse().map(Self::Tab),
            "fields" => Ok(Self::Fields),
            "options" => Ok(Self::Options(required(rest, "options <field>")?.to_string())),
            "set" => {
                let rest = rest.trim_start();
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Self::Set {
                    field: required(field, "set <field> [value]")?.to_string(),
                    value: value.trim().to_string(),
                })
            }
            "show" => Ok(Self::Show),
            "summary" => Ok(Self::Summary),
            "list" | "ls" => Ok(Self::List),
            "edit" => parse_id(required(rest, "edit <id>")?).map(Self::Edit),
            "cancel" => Ok(Self::Cancel),
            "save" => Ok(Self::Save),
            "delete" | "rm" => parse_id(required(rest, "delete <id>")?).map(Self::Delete),
            "collapse" => Ok(Self::Collapse),
            "sidebar" => Ok(Self::Sidebar),
            "quit" | "exit" => Ok(Self::Quit),
            "" => Err(String::new()),
            other => Err(format!("unknown command '{other}', try 'help'")),
        }
    }
}
