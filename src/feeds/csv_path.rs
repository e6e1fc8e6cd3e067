use crate::errors::{PricingError, PricingResult};
use crate::product::scenario::{ScenarioSet, UnderlyingPath};
use chrono::NaiveDate;
use std::path::Path;

/// Sample path loader. Expected layout:
///
///   date,price
///   2024-01-02,20.00
///   2024-01-03,20.13
///
/// `price` is required. `date` is optional but, when present, must be filled
/// on every row and strictly increasing. Other columns are ignored.
#[derive(Debug, serde::Deserialize)]
struct PathRow {
    #[serde(default)]
    date: Option<NaiveDate>,
    price: f64,
}

pub fn read_path<R: std::io::Read>(reader: R) -> PricingResult<UnderlyingPath> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut prices = Vec::new();
    let mut dates = Vec::new();
    for (line, row) in rdr.deserialize::<PathRow>().enumerate() {
        let row = row?;
        prices.push(row.price);
        if let Some(d) = row.date {
            dates.push(d);
        }
        // A date column that is only partly filled would misalign days.
        if !dates.is_empty() && dates.len() != prices.len() {
            return Err(PricingError::Data(format!(
                "row {}: date column is only partly filled",
                line + 1
            )));
        }
    }

    let path = if dates.is_empty() {
        UnderlyingPath::new(prices)
    } else {
        UnderlyingPath::with_dates(prices, dates)
    };
    path.map_err(|e| PricingError::Data(e.to_string()))
}

pub fn load_path(file: &Path) -> PricingResult<UnderlyingPath> {
    let f = std::fs::File::open(file)
        .map_err(|e| PricingError::Data(format!("{}: {e}", file.display())))?;
    read_path(f).map_err(|e| PricingError::Data(format!("{}: {e}", file.display())))
}

/// Load `<dir>/<label>.csv` for every label.
pub fn load_scenarios(dir: &Path, labels: &[String]) -> PricingResult<ScenarioSet> {
    let mut set = ScenarioSet::new();
    for label in labels {
        let file = dir.join(format!("{label}.csv"));
        let path = load_path(&file)?;
        tracing::info!(
            scenario = %label,
            file = %file.display(),
            days = path.len(),
            initial_fixing = path.initial_fixing(),
            "loaded sample path"
        );
        set.insert(label.clone(), path);
    }
    Ok(set)
}
