//! CSV parsing and writing for the product catalog.
//!
//! Zero I/O: handlers pass the CSV text in and persist the rows themselves.
//! Column headers follow the Brazilian Portuguese conventions of the
//! spreadsheets this importer replaces (`Nome`, `Preço`, `Estoque`, ...),
//! prices are `R$` amounts with a comma decimal separator, and dates accept
//! both `dd/MM/yyyy` and `yyyy-MM-dd`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;

// ── Column headers ───────────────────────────────────────────────────

/// Header row written by the catalog export.
pub const EXPORT_HEADER: &str = "Nome,Categoria,Preço,Estoque,Data de Validade";

/// Accepted spellings per column, compared case-insensitively after trim.
/// Unaccented variants cover spreadsheets saved with mangled encodings.
const NAME_ALIASES: &[&str] = &["nome"];
const CATEGORY_ALIASES: &[&str] = &["categoria"];
const PRICE_ALIASES: &[&str] = &["preço", "preço unitário", "preco", "preco unitario"];
const STOCK_ALIASES: &[&str] = &["estoque", "estoque atual"];
const EXPIRY_ALIASES: &[&str] = &["data de validade", "validade"];

// ── Types ────────────────────────────────────────────────────────────

/// One successfully parsed data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    /// 1-based record number in the file, counting the header.
    pub line: usize,
    pub name: String,
    pub category: Option<String>,
    pub price_cents: i64,
    pub current_stock: i32,
    pub expiry_date: Option<NaiveDate>,
}

/// A row that failed validation. Serialized into the import run history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Outcome of parsing one CSV file. Bad rows never abort the import; they
/// are collected here while the good rows proceed.
#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    pub rows: Vec<ProductRow>,
    pub errors: Vec<RowError>,
}

impl ParsedImport {
    /// Data rows seen, valid or not (header excluded).
    pub fn total_rows(&self) -> usize {
        self.rows.len() + self.errors.len()
    }
}

/// One row of a catalog export.
#[derive(Debug, Clone)]
pub struct ExportRow {
    pub name: String,
    pub category: Option<String>,
    pub price_cents: i64,
    pub current_stock: i32,
    pub expiry_date: Option<NaiveDate>,
}

/// Resolved header positions. Only the name column is required.
struct ColumnMap {
    name: usize,
    category: Option<usize>,
    price: Option<usize>,
    stock: Option<usize>,
    expiry: Option<usize>,
}

// ── Parsing ──────────────────────────────────────────────────────────

/// Split CSV text into records, honoring quotes.
///
/// Fields may be wrapped in double quotes; quoted fields may contain commas,
/// newlines, and doubled quotes (`""` for a literal quote). Both LF and CRLF
/// record separators are accepted. Blank lines are skipped.
pub fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => record.push(std::mem::take(&mut field)),
                // CR is swallowed; LF terminates the record.
                '\r' => {}
                '\n' => {
                    record.push(std::mem::take(&mut field));
                    flush_record(&mut records, &mut record);
                }
                _ => field.push(c),
            }
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        flush_record(&mut records, &mut record);
    }

    records
}

/// Blank lines parse as a single empty field; drop them.
fn flush_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>) {
    if record.len() == 1 && record[0].trim().is_empty() {
        record.clear();
        return;
    }
    records.push(std::mem::take(record));
}

/// Parse a product catalog CSV.
///
/// Fails only when the file is empty or the header lacks a name column.
/// Individual rows are validated independently: a bad price, stock, or date
/// becomes a [`RowError`] and the remaining rows still import.
pub fn parse_products_csv(text: &str) -> Result<ParsedImport, CoreError> {
    let records = parse_records(text);
    let Some(header) = records.first() else {
        return Err(CoreError::Validation("CSV file is empty".to_string()));
    };
    let columns = resolve_columns(header)?;

    let mut parsed = ParsedImport::default();
    for (index, record) in records.iter().enumerate().skip(1) {
        let line = index + 1;
        match parse_row(record, &columns, line) {
            Ok(row) => parsed.rows.push(row),
            Err(message) => parsed.errors.push(RowError { line, message }),
        }
    }

    Ok(parsed)
}

fn resolve_columns(header: &[String]) -> Result<ColumnMap, CoreError> {
    let name = find_column(header, NAME_ALIASES).ok_or_else(|| {
        CoreError::Validation("CSV header is missing the required column: Nome".to_string())
    })?;
    Ok(ColumnMap {
        name,
        category: find_column(header, CATEGORY_ALIASES),
        price: find_column(header, PRICE_ALIASES),
        stock: find_column(header, STOCK_ALIASES),
        expiry: find_column(header, EXPIRY_ALIASES),
    })
}

fn find_column(header: &[String], aliases: &[&str]) -> Option<usize> {
    header.iter().position(|h| {
        let h = h.trim().to_lowercase();
        aliases.contains(&h.as_str())
    })
}

fn parse_row(record: &[String], columns: &ColumnMap, line: usize) -> Result<ProductRow, String> {
    let field = |idx: Option<usize>| -> &str {
        idx.and_then(|i| record.get(i))
            .map(|f| f.trim())
            .unwrap_or("")
    };

    let name = field(Some(columns.name));
    if name.is_empty() {
        return Err("product name is empty".to_string());
    }

    let category = match field(columns.category) {
        "" => None,
        c => Some(c.to_string()),
    };

    let price_cents = match field(columns.price) {
        "" => 0,
        raw => parse_price_brl(raw).ok_or_else(|| format!("invalid price: {raw}"))?,
    };

    let current_stock = match field(columns.stock) {
        "" => 0,
        raw => raw
            .parse::<i32>()
            .ok()
            .filter(|s| *s >= 0)
            .ok_or_else(|| format!("invalid stock quantity: {raw}"))?,
    };

    let expiry_date = match field(columns.expiry) {
        "" => None,
        raw => Some(parse_flexible_date(raw).ok_or_else(|| format!("invalid date: {raw}"))?),
    };

    Ok(ProductRow {
        line,
        name: name.to_string(),
        category,
        price_cents,
        current_stock,
        expiry_date,
    })
}

// ── Prices ───────────────────────────────────────────────────────────

/// Parse a Brazilian-format price into integer centavos.
///
/// Accepts `R$ 12,34`, `12,34`, `12.34`, `1.234,56` (thousands dot), and
/// whole numbers. Rejects negatives and more than two decimal digits.
pub fn parse_price_brl(raw: &str) -> Option<i64> {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("R$").or_else(|| s.strip_prefix("r$")) {
        s = rest.trim_start();
    }
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() {
        return None;
    }

    // A comma is always the decimal separator. A dot is only decimal when at
    // most two digits follow it; otherwise it is a thousands separator.
    let (int_part, frac_part) = if let Some(pos) = s.rfind(',') {
        (s[..pos].replace('.', ""), s[pos + 1..].to_string())
    } else if let Some(pos) = s.rfind('.') {
        let frac = &s[pos + 1..];
        if frac.len() <= 2 {
            (s[..pos].to_string(), frac.to_string())
        } else {
            (s.replace('.', ""), String::new())
        }
    } else {
        (s, String::new())
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
        || frac_part.len() > 2
    {
        return None;
    }

    let int_val: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };
    let frac_val: i64 = match frac_part.len() {
        0 => 0,
        1 => frac_part.parse::<i64>().ok()? * 10,
        _ => frac_part.parse().ok()?,
    };
    int_val.checked_mul(100)?.checked_add(frac_val)
}

/// Render centavos as `R$ n,nn`.
pub fn format_price_brl(cents: i64) -> String {
    format!("R$ {},{:02}", cents / 100, cents % 100)
}

// ── Dates ────────────────────────────────────────────────────────────

/// Parse `dd/MM/yyyy` or `yyyy-MM-dd`.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    NaiveDate::parse_from_str(s, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

/// Render a date as `dd/MM/yyyy`.
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

// ── Writing ──────────────────────────────────────────────────────────

/// Build the catalog export CSV.
///
/// Prices render as `R$ n,nn`, which embeds a comma, so generated fields go
/// through the quoting rules and the output re-imports cleanly.
pub fn write_products_csv(rows: &[ExportRow]) -> String {
    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(EXPORT_HEADER);
    out.push('\n');
    for row in rows {
        let fields = [
            escape_field(&row.name),
            escape_field(row.category.as_deref().unwrap_or("")),
            escape_field(&format_price_brl(row.price_cents)),
            row.current_stock.to_string(),
            row.expiry_date.map(format_date_br).unwrap_or_default(),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ── Tests ────────────────────────────────────────────────────────────
