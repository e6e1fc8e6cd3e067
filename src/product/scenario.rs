use crate::errors::{PricingError, PricingResult};
use crate::product::calendar::TradingCalendar;
use crate::product::reverse_convertible::{BarrierParameters, ReverseConvertible, ValuationPoint};
use chrono::NaiveDate;
use smallvec::SmallVec;

/// What to do with path days that fall at or after the note's maturity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaturityPolicy {
    /// Stop the series at the last day with t > 0.
    #[default]
    Truncate,
    /// Fail the whole scenario.
    Reject,
}

impl std::fmt::Display for MaturityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncate => write!(f, "truncate"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

impl std::str::FromStr for MaturityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate" => Ok(Self::Truncate),
            "reject" => Ok(Self::Reject),
            other => Err(format!("expected `truncate` or `reject`, got `{other}`")),
        }
    }
}

/// Ordered spot observations, one per trading day. Non-empty and strictly
/// positive by construction, so `initial_fixing` never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct UnderlyingPath {
    prices: Vec<f64>,
    dates: Option<Vec<NaiveDate>>,
}

impl UnderlyingPath {
    pub fn new(prices: Vec<f64>) -> PricingResult<Self> {
        if prices.is_empty() {
            return Err(PricingError::invalid("path", "must contain at least one price"));
        }
        if let Some((day, bad)) = prices
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.is_finite() && **p > 0.0))
        {
            return Err(PricingError::invalid(
                "path",
                format!("price on day {day} must be positive, got {bad}"),
            ));
        }
        Ok(Self { prices, dates: None })
    }

    /// Dated path. Dates must line up one-to-one with prices and increase strictly.
    pub fn with_dates(prices: Vec<f64>, dates: Vec<NaiveDate>) -> PricingResult<Self> {
        if dates.len() != prices.len() {
            return Err(PricingError::invalid(
                "path",
                format!("{} dates for {} prices", dates.len(), prices.len()),
            ));
        }
        if let Some(w) = dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(PricingError::invalid(
                "path",
                format!("dates out of order: {} followed by {}", w[0], w[1]),
            ));
        }
        let mut path = Self::new(prices)?;
        path.dates = Some(dates);
        Ok(path)
    }

    /// S0, the reference fixing for strike and normalization.
    #[inline]
    pub fn initial_fixing(&self) -> f64 {
        self.prices[0]
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Never true for a constructed path.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Valuation curve for one scenario.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScenarioResult {
    /// H / S0 * 100
    #[serde(rename = "barrier")]
    pub normalized_barrier_level: f64,
    pub series: Vec<ValuationPoint>,
}

/// Labelled paths evaluated against the same note terms. Usually
/// "up", "down" and "sideways".
#[derive(Debug, Clone, Default)]
pub struct ScenarioSet {
    entries: SmallVec<[(String, UnderlyingPath); 3]>,
}

impl ScenarioSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the path stored under `label`.
    pub fn insert(&mut self, label: impl Into<String>, path: UnderlyingPath) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = path,
            None => self.entries.push((label, path)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&UnderlyingPath> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, p)| p)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ScenarioSet {
    type Item = (String, UnderlyingPath);
    type IntoIter = smallvec::IntoIter<[(String, UnderlyingPath); 3]>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Drives the note valuation across a whole path.
///
/// Stateless and `Copy`: scenarios share nothing but read-only inputs, so
/// callers may run one processor per scenario on separate threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioProcessor {
    pub calendar: TradingCalendar,
    pub policy: MaturityPolicy,
}

impl ScenarioProcessor {
    pub fn new(calendar: TradingCalendar, policy: MaturityPolicy) -> Self {
        Self { calendar, policy }
    }

    /// One point per day in path order. A day that fails to price aborts the
    /// scenario; no partial series is returned.
    pub fn process(
        &self,
        path: &UnderlyingPath,
        params: &BarrierParameters,
    ) -> PricingResult<ScenarioResult> {
        let s0 = path.initial_fixing();
        let note = ReverseConvertible::new(*params, s0, self.calendar)?;

        if params.barrier >= s0 {
            tracing::warn!(
                barrier = params.barrier,
                initial_fixing = s0,
                "barrier is not below the initial fixing"
            );
        }

        let mut series = Vec::with_capacity(path.len());
        for (day, &spot) in path.prices().iter().enumerate() {
            if self.calendar.remaining_maturity(params.maturity, day) <= 0.0 {
                match self.policy {
                    MaturityPolicy::Truncate => {
                        tracing::warn!(
                            maturity = params.maturity,
                            kept = day,
                            dropped = path.len() - day,
                            "path runs past maturity, truncating series"
                        );
                        break;
                    }
                    MaturityPolicy::Reject => {
                        return Err(PricingError::invalid(
                            "maturity",
                            format!(
                                "day {day} is at or past maturity {} ({} trading days/year)",
                                params.maturity,
                                self.calendar.days_per_year()
                            ),
                        ));
                    }
                }
            }
            series.push(note.value_at(day, spot)?);
        }

        tracing::debug!(
            points = series.len(),
            initial_fixing = s0,
            first_date = ?path.dates().and_then(|d| d.first()),
            "scenario valued"
        );

        Ok(ScenarioResult {
            normalized_barrier_level: params.barrier / note.initial_fixing() * 100.0,
            series,
        })
    }
}
