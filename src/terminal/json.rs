use colored_json::{Color, ColoredFormatter, PrettyFormatter, Styler};
use serde::Serialize;

/// Pretty JSON, colored when stdout is a terminal and plain otherwise.
pub fn to_display_string<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    let formatter = ColoredFormatter::with_styler(
        PrettyFormatter::new(),
        Styler {
            key: Color::Green.normal(),
            string_value: Color::Blue.bold(),
            integer_value: Color::Purple.bold(),
            float_value: Color::Purple.italic(),
            object_brackets: Color::Yellow.bold(),
            array_brackets: Color::Cyan.bold(),
            bool_value: Color::Red.bold(),
            ..Default::default()
        },
    );

    formatter.to_colored_json_auto(&value)
}
