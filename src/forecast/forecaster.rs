//! Forecaster
//!
//! Fits an [`AdditiveModel`] to one disease's monthly series and projects
//! it forward at month-start frequency.

use super::error::{ForecastError, ForecastResult};
use super::model::{normal_quantile, AdditiveModel};
use crate::dashboard::format_count;
use crate::surveillance::MonthlyCount;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Forecast settings
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Months to project past the last observation
    #[serde(default = "default_periods")]
    pub periods: u32,

    /// Maximum Fourier order of the yearly seasonality
    #[serde(default = "default_fourier_order")]
    pub fourier_order: usize,

    /// Central width of the uncertainty interval (0, 1)
    #[serde(default = "default_interval_width")]
    pub interval_width: f64,

    /// Ridge penalty on trend slope and seasonal coefficients
    #[serde(default = "default_regularization")]
    pub regularization: f64,
}

fn default_periods() -> u32 {
    12
}

fn default_fourier_order() -> usize {
    3
}

fn default_interval_width() -> f64 {
    0.8
}

fn default_regularization() -> f64 {
    0.01
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            periods: default_periods(),
            fourier_order: default_fourier_order(),
            interval_width: default_interval_width(),
            regularization: default_regularization(),
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> ForecastResult<()> {
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "interval_width must be in (0, 1), got {}",
                self.interval_width
            )));
        }
        if !(self.regularization.is_finite() && self.regularization >= 0.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "regularization must be a non-negative number, got {}",
                self.regularization
            )));
        }
        if self.periods == 0 {
            return Err(ForecastError::InvalidConfig(
                "periods must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A predicted value with its uncertainty interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// Yearly seasonal component at one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonalPoint {
    pub date: NaiveDate,
    pub yearly: f64,
}

/// Result of forecasting one disease
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub disease: String,
    pub history: Vec<MonthlyCount>,
    /// In-sample predictions for each historic month
    pub fitted: Vec<ForecastPoint>,
    /// Projections after the last historic month
    pub future: Vec<ForecastPoint>,
    /// Seasonal component over the first twelve months; empty when the
    /// series was too short for seasonality
    pub seasonality: Vec<SeasonalPoint>,
    /// Highest projected month (first on ties)
    pub peak: Option<ForecastPoint>,
    pub fourier_order: usize,
}

impl Forecast {
    /// "2026년 01월에 약 1,234명으로 유행 정점이 예상됩니다."
    pub fn peak_comment(&self) -> Option<String> {
        self.peak.map(|peak| {
            format!(
                "{}에 약 {}명으로 유행 정점이 예상됩니다.",
                peak.date.format("%Y년 %m월"),
                format_count(peak.yhat as u64)
            )
        })
    }
}

/// Fits and projects monthly disease series
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    pub fn new(config: ForecastConfig) -> ForecastResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast with the configured number of periods
    pub fn forecast(&self, disease: &str, series: &[MonthlyCount]) -> ForecastResult<Forecast> {
        self.forecast_periods(disease, series, self.config.periods)
    }

    /// Forecast `periods` months past the last observation
    pub fn forecast_periods(
        &self,
        disease: &str,
        series: &[MonthlyCount],
        periods: u32,
    ) -> ForecastResult<Forecast> {
        let mut history = series.to_vec();
        history.sort_by_key(|m| m.date);
        history.dedup_by_key(|m| m.date);

        let observations: Vec<(NaiveDate, f64)> =
            history.iter().map(|m| (m.date, m.count as f64)).collect();

        let model = AdditiveModel::fit(
            &observations,
            self.config.fourier_order,
            self.config.regularization,
        )?;

        let z = normal_quantile(self.config.interval_width)?;
        let n = history.len() as f64;

        let fitted: Vec<ForecastPoint> = history
            .iter()
            .map(|m| point(&model, m.date, z * model.sigma()))
            .collect();

        let last = history.last().map(|m| m.date).ok_or(ForecastError::InsufficientData {
            required: super::model::MIN_POINTS,
            found: 0,
        })?;

        // Uncertainty widens with distance from the history
        let future: Vec<ForecastPoint> = (1..=periods)
            .filter_map(|h| {
                let date = last.checked_add_months(Months::new(h))?;
                let band = z * model.sigma() * (1.0 + h as f64 / n).sqrt();
                Some(point(&model, date, band))
            })
            .collect();

        let seasonality = if model.fourier_order() == 0 {
            Vec::new()
        } else {
            history
                .iter()
                .map(|m| m.date)
                .chain(future.iter().map(|p| p.date))
                .take(12)
                .map(|date| SeasonalPoint {
                    date,
                    yearly: model.yearly(date),
                })
                .collect()
        };

        let peak = peak_point(&future);

        tracing::debug!(
            disease = %disease,
            points = history.len(),
            periods,
            fourier_order = model.fourier_order(),
            sigma = model.sigma(),
            "Fitted forecast model"
        );

        Ok(Forecast {
            disease: disease.to_string(),
            history,
            fitted,
            future,
            seasonality,
            peak,
            fourier_order: model.fourier_order(),
        })
    }
}

/// Point with the highest `yhat`; the earliest one wins ties
fn peak_point(points: &[ForecastPoint]) -> Option<ForecastPoint> {
    points
        .iter()
        .copied()
        .reduce(|best, p| if p.yhat > best.yhat { p } else { best })
}

/// Counts cannot be negative, so every bound is clamped at zero
fn point(model: &AdditiveModel, date: NaiveDate, band: f64) -> ForecastPoint {
    let yhat = model.predict(date);
    ForecastPoint {
        date,
        yhat: yhat.max(0.0),
        yhat_lower: (yhat - band).max(0.0),
        yhat_upper: (yhat + band).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn series(values: &[u64]) -> Vec<MonthlyCount> {
        values
            .iter()
            .enumerate()
            .map(|(i, &count)| MonthlyCount {
                date: NaiveDate::from_ymd_opt(2025, i as u32 + 1, 1).unwrap(),
                count,
            })
            .collect()
    }

    #[test]
    fn test_future_months_follow_history() {
        let forecast = Forecaster::default()
            .forecast("수두", &series(&[100; 12]))
            .unwrap();

        assert_eq!(forecast.future.len(), 12);
        assert_eq!(
            forecast.future[0].date,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
        assert_eq!(
            forecast.future[11].date,
            NaiveDate::from_ymd_opt(2026, 12, 1).unwrap()
        );
        assert!(forecast
            .future
            .iter()
            .all(|p| (p.yhat - 100.0).abs() < 1e-6));
    }

    #[test]
    fn test_peak_prefers_earliest_on_tie() {
        let at = |month: u32, yhat: f64| ForecastPoint {
            date: NaiveDate::from_ymd_opt(2026, month, 1).unwrap(),
            yhat,
            yhat_lower: yhat,
            yhat_upper: yhat,
        };
        let points = vec![at(1, 10.0), at(2, 30.0), at(3, 30.0), at(4, 20.0), at(5, 30.0)];

        let peak = peak_point(&points).unwrap();
        assert_eq!(peak.date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert!(peak_point(&[]).is_none());
    }

    #[test]
    fn test_winter_peak_is_projected() {
        let values: Vec<u64> = (0..12)
            .map(|m| (1000.0 + 500.0 * (2.0 * std::f64::consts::PI * m as f64 / 12.0).cos()) as u64)
            .collect();
        let forecast = Forecaster::default().forecast("인플루엔자", &series(&values)).unwrap();

        let peak = forecast.peak.unwrap();
        assert_eq!(peak.date.month(), 1);
        assert!((peak.yhat - 1500.0).abs() < 150.0, "peak was {}", peak.yhat);
        assert_eq!(forecast.seasonality.len(), 12);
    }

    #[test]
    fn test_declining_series_never_negative() {
        let values: Vec<u64> = (0..12).map(|m| 1200 - 100 * m).collect();
        let forecast = Forecaster::default().forecast("결핵", &series(&values)).unwrap();

        for p in &forecast.future {
            assert!(p.yhat >= 0.0);
            assert!(p.yhat_lower >= 0.0);
            assert!(p.yhat_upper >= p.yhat);
        }
    }

    #[test]
    fn test_interval_contains_prediction() {
        let values = [120, 80, 95, 130, 60, 110, 90, 140, 70, 100, 125, 85];
        let forecast = Forecaster::default().forecast("A형간염", &series(&values)).unwrap();

        for p in forecast.fitted.iter().chain(&forecast.future) {
            assert!(p.yhat_lower <= p.yhat && p.yhat <= p.yhat_upper);
        }
    }

    #[test]
    fn test_short_series() {
        let forecaster = Forecaster::default();

        let err = forecaster.forecast("파상풍", &series(&[5])).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData { found: 1, .. }));

        let forecast = forecaster.forecast("파상풍", &series(&[5, 7])).unwrap();
        assert_eq!(forecast.fourier_order, 0);
        assert!(forecast.seasonality.is_empty());
    }

    #[test]
    fn test_custom_periods() {
        let forecast = Forecaster::default()
            .forecast_periods("수두", &series(&[10; 12]), 3)
            .unwrap();
        assert_eq!(forecast.future.len(), 3);
    }

    #[test]
    fn test_peak_comment() {
        let forecast = Forecaster::default()
            .forecast("수두", &series(&[1_500; 12]))
            .unwrap();
        let comment = forecast.peak_comment().unwrap();
        assert!(comment.starts_with("2026년 "), "{}", comment);
        assert!(comment.contains("약 1,"), "{}", comment);
        assert!(comment.ends_with("유행 정점이 예상됩니다."), "{}", comment);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ForecastConfig {
            interval_width: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            Forecaster::new(config),
            Err(ForecastError::InvalidConfig(_))
        ));
    }
}
