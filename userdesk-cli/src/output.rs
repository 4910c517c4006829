//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use userdesk_core::User;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render users as an ID / Name / Email table
pub fn user_table(users: &[User]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["ID", "Name", "Email"]);
    for user in users {
        table.add_row(vec![user.id.to_string(), user.name.clone(), user.email.clone()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_table_has_row_per_user() {
        let users = vec![
            User::new(1, "John", "john@example.com"),
            User::new(2, "Joana", "joana@example.com"),
        ];
        let table = user_table(&users);
        assert_eq!(table.row_iter().count(), 2);

        let rendered = table.to_string();
        assert!(rendered.contains("Email"));
        assert!(rendered.contains("joana@example.com"));
    }
}
