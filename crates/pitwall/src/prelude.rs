pub use crate::error::Error;

pub use anstream::eprintln;
pub use anstream::print;
pub use anstream::println;
pub use color_eyre::eyre::{eyre, Result};

/// Borderless table with a light column rule, used by the list layouts
pub fn new_table() -> prettytable::Table {
    let mut table = prettytable::Table::new();

    let format = prettytable::format::FormatBuilder::new()
        .column_separator('│')
        .padding(1, 1)
        .build();

    table.set_format(format);

    table
}
