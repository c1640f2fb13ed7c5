use std::io::{self, Write};

use serde::Serialize;

use crate::error::CliError;

/// Pretty JSON with two-space indentation, the only format either binary emits.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write `value` to stdout followed by a newline.
pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    emit(&to_pretty_json(value)?)
}

/// Write an already rendered payload to stdout followed by a newline.
pub fn emit(payload: &str) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{payload}")?;
    handle.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Listing {
        mode: &'static str,
        count: usize,
    }

    #[test]
    fn json_is_indented_with_two_spaces_in_field_order() {
        let rendered = to_pretty_json(&Listing {
            mode: "popular",
            count: 1,
        })
        .expect("renders");
        assert_eq!(rendered, "{\n  \"mode\": \"popular\",\n  \"count\": 1\n}");
    }
}
