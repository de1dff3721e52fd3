//! JSON-lines command scripts

use std::io::BufRead;

use crate::application::dto::LedgerCommand;
use crate::shared::errors::ScriptError;

/// Parse a script: one JSON command per line.
///
/// Blank lines and lines starting with `#` are skipped. Line numbers in
/// errors are 1-based.
pub fn parse_script<R: BufRead>(reader: R) -> Result<Vec<LedgerCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let command = serde_json::from_str(trimmed).map_err(|source| {
            ScriptError::InvalidCommand {
                line: idx + 1,
                source,
            }
        })?;
        commands.push(command);
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Principal;

    #[test]
    fn skips_blank_and_comment_lines() {
        let script = "# setup\n\n{\"op\":\"register_station\",\"station_id\":1,\"price\":100,\"caller\":\"A\"}\n{\"op\":\"stats\"}\n";
        let commands = parse_script(script.as_bytes()).unwrap();
        assert_eq!(
            commands,
            vec![
                LedgerCommand::RegisterStation {
                    station_id: 1,
                    price: 100,
                    caller: Principal::from("A"),
                },
                LedgerCommand::Stats,
            ]
        );
    }

    #[test]
    fn reports_failing_line() {
        let script = "{\"op\":\"stats\"}\n{\"op\":\"teleport\"}\n";
        match parse_script(script.as_bytes()) {
            Err(ScriptError::InvalidCommand { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
