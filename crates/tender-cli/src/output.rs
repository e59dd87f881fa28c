use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Tab-separated rows under a tab-separated header. Columns are not padded so
/// the output stays easy to `cut`.
pub fn print_tsv(headers: &[&str], rows: Vec<Vec<String>>) {
    println!("{}", headers.join("\t"));
    for row in rows {
        println!("{}", row.join("\t"));
    }
}
