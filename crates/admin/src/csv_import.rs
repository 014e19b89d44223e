//! Product import from a published spreadsheet CSV.
//!
//! The first record is the header. Columns are matched case-insensitively:
//!
//! | Field | Headers |
//! |-------|---------|
//! | id | `id` |
//! | title | `title`, `name` |
//! | category | `category`, `type` |
//! | price | first header containing `price` |
//! | image | `image`, `img`, `photo` |
//! | description | `desc`, `description` |
//!
//! Other columns are ignored. Fields may be double-quoted, with `""` for a
//! literal quote.

use mountrush_core::{DEFAULT_CATEGORY, PLACEHOLDER_IMAGE, Price, Product, ProductId};
use mountrush_storefront::storage::KeyValueStore;
use rust_decimal::Decimal;
use tracing::{info, instrument};
use url::Url;

use crate::error::{AdminError, Result};
use crate::products::save_overrides;

/// Parse CSV text into products. `stamp` seeds generated ids
/// (`p-import-<stamp>-<row>`).
#[must_use]
pub fn parse_csv_products(text: &str, stamp: i64) -> Vec<Product> {
    let mut records = parse_records(text).into_iter();
    let Some(header) = records.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
    let price_column = header.iter().position(|h| h.contains("price"));

    records
        .enumerate()
        .filter_map(|(row, fields)| {
            let cell = |names: &[&str]| {
                names.iter().find_map(|name| {
                    header
                        .iter()
                        .position(|h| h == name)
                        .and_then(|i| fields.get(i))
                        .map(|v| v.trim())
                        .filter(|v| !v.is_empty())
                })
            };

            let id = cell(&["id"])
                .and_then(|raw| ProductId::parse(raw).ok())
                .or_else(|| ProductId::parse(&format!("p-import-{stamp}-{row}")).ok());
            let price = price_column
                .and_then(|i| fields.get(i))
                .map_or(Price::ZERO, |raw| parse_price(raw));

            let mut product = Product::new(
                id?,
                cell(&["title", "name"]).map_or_else(|| format!("Item {}", row + 1), str::to_string),
                cell(&["category", "type"]).unwrap_or(DEFAULT_CATEGORY),
                price,
            );
            product.image = cell(&["image", "img", "photo"])
                .unwrap_or(PLACEHOLDER_IMAGE)
                .to_string();
            product.description = cell(&["desc", "description"]).unwrap_or_default().to_string();
            Some(product)
        })
        .collect()
}

/// Keep digits, `.` and `-`, then round. Anything unusable is zero.
fn parse_price(raw: &str) -> Price {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned
        .parse::<Decimal>()
        .map_or(Price::ZERO, Price::round_from)
}

/// Split CSV text into records of fields. Blank lines are skipped.
fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    let mut finish_record = |record: &mut Vec<String>, field: &mut String| {
        record.push(std::mem::take(field));
        let blank = record.len() == 1 && record.first().is_some_and(|f| f.trim().is_empty());
        if !blank {
            records.push(std::mem::take(record));
        }
        record.clear();
    };

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => finish_record(&mut record, &mut field),
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        finish_record(&mut record, &mut field);
    }

    records
}

/// Fetches a published CSV sheet over HTTP.
#[derive(Debug, Clone, Default)]
pub struct SheetImporter {
    client: reqwest::Client,
}

impl SheetImporter {
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Download and parse the sheet at `url`. Single attempt, no retry.
    ///
    /// # Errors
    ///
    /// Returns `FetchStatus` for a non-success response, `NoRows` when the
    /// sheet holds no products, or `Http` if the request fails.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<Vec<Product>> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdminError::FetchStatus(status.as_u16()));
        }

        let text = response.text().await?;
        let products = parse_csv_products(&text, chrono::Utc::now().timestamp_millis());
        if products.is_empty() {
            return Err(AdminError::NoRows);
        }
        Ok(products)
    }
}

/// Fetch a sheet and save its products as the override.
///
/// # Errors
///
/// As [`SheetImporter::fetch`], plus storage errors. The stored override is
/// untouched on failure.
pub async fn import_sheet<S>(
    store: &mut S,
    importer: &SheetImporter,
    url: &Url,
) -> Result<Vec<Product>>
where
    S: KeyValueStore + ?Sized,
{
    let products = importer.fetch(url).await?;
    save_overrides(store, &products)?;
    info!(count = products.len(), "Imported products from sheet");
    Ok(products)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_sheet() {
        let csv = "ID,Name,Type,Price (INR),Photo,Description\n\
                   t-1,Dome Tent,camping,\"₹8,499\",tent.jpg,Two person\n\
                   t-2,Headlamp,gear,799.5,,\n";
        let products = parse_csv_products(csv, 1);

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id.as_str(), "t-1");
        assert_eq!(products[0].title, "Dome Tent");
        assert_eq!(products[0].category, "camping");
        assert_eq!(products[0].price, Price::new(8499));
        assert_eq!(products[0].image, "tent.jpg");
        assert_eq!(products[0].description, "Two person");

        assert_eq!(products[1].price, Price::new(800));
        assert_eq!(products[1].image, PLACEHOLDER_IMAGE);
        assert_eq!(products[1].description, "");
    }

    #[test]
    fn test_defaults_for_missing_columns() {
        let csv = "price\r\n100\r\n\r\nabc\r\n-5\r\n";
        let products = parse_csv_products(csv, 42);

        assert_eq!(products.len(), 3);
        assert_eq!(products[0].id.as_str(), "p-import-42-0");
        assert_eq!(products[0].title, "Item 1");
        assert_eq!(products[0].category, DEFAULT_CATEGORY);
        assert_eq!(products[1].id.as_str(), "p-import-42-1");
        assert_eq!(products[1].price, Price::ZERO);
        assert_eq!(products[2].price, Price::ZERO);
    }

    #[test]
    fn test_quoted_fields() {
        let csv = "id,title,desc\nq-1,\"Stove, Compact\",\"Says \"\"hot\"\"\nsecond line\"\n";
        let products = parse_csv_products(csv, 0);

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Stove, Compact");
        assert_eq!(products[0].description, "Says \"hot\"\nsecond line");
    }

    #[test]
    fn test_title_falls_back_to_name() {
        let csv = "id,title,name\nn-1,,Trekking Pole\n";
        let products = parse_csv_products(csv, 0);
        assert_eq!(products[0].title, "Trekking Pole");
    }

    #[test]
    fn test_empty_and_header_only() {
        assert!(parse_csv_products("", 0).is_empty());
        assert!(parse_csv_products("\n\n", 0).is_empty());
        assert!(parse_csv_products("id,title,price\n", 0).is_empty());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("₹1,299"), Price::new(1299));
        assert_eq!(parse_price("12.5"), Price::new(13));
        assert_eq!(parse_price(""), Price::ZERO);
        assert_eq!(parse_price("1.2.3"), Price::ZERO);
        assert_eq!(parse_price("-40"), Price::ZERO);
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_http_error() {
        let importer = SheetImporter::default();
        let url = Url::parse("http://127.0.0.1:9/sheet.csv").unwrap();
        assert!(matches!(
            importer.fetch(&url).await,
            Err(AdminError::Http(_))
        ));
    }
}
