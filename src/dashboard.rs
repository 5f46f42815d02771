//! Dashboard Module
//! One request per UI interaction: the selected view goes in, a view model comes out.
//!
//! Aggregator failures are turned into placeholder view models so a broken
//! chart never prevents the other views from rendering.

use crate::config::DashboardConfig;
use crate::data::schema::{CategoricalFeature, NumericFeature};
use crate::data::Dataset;
use crate::stats::{
    AggregateError, CategoricalAggregator, CategoryBreakdown, CorrelationAggregator,
    CorrelationMatrix, CountryAggregator, CountryCancellation, DataOverview, NumericAggregator,
    NumericDistribution, OverviewBuilder, TargetAggregator, TargetSummary,
};
use serde::Serialize;
use std::sync::Arc;

/// Top-level sections of the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    BusinessUnderstanding,
    DataOverview,
    ExploratoryAnalysis,
}

impl Section {
    pub const ALL: [Section; 3] = [
        Section::BusinessUnderstanding,
        Section::DataOverview,
        Section::ExploratoryAnalysis,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::BusinessUnderstanding => "Business Understanding",
            Section::DataOverview => "Data Overview",
            Section::ExploratoryAnalysis => "Exploratory Data Analysis",
        }
    }
}

/// Tabs of the analysis section, with the column picked in the tab's selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AnalysisTab {
    Target,
    Numeric(NumericFeature),
    Categorical(CategoricalFeature),
    Country,
    Correlation,
}

impl AnalysisTab {
    pub fn title(&self) -> &'static str {
        match self {
            AnalysisTab::Target => "Target Analysis",
            AnalysisTab::Numeric(_) => "Numeric Features",
            AnalysisTab::Categorical(_) => "Categorical Features",
            AnalysisTab::Country => "Country Analysis",
            AnalysisTab::Correlation => "Correlation",
        }
    }

    /// Every tab, with each selector enumerated.
    pub fn all() -> Vec<AnalysisTab> {
        let mut tabs = vec![AnalysisTab::Target];
        tabs.extend(NumericFeature::ALL.into_iter().map(AnalysisTab::Numeric));
        tabs.extend(CategoricalFeature::ALL.into_iter().map(AnalysisTab::Categorical));
        tabs.push(AnalysisTab::Country);
        tabs.push(AnalysisTab::Correlation);
        tabs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewRequest {
    BusinessUnderstanding,
    DataOverview,
    Analysis(AnalysisTab),
}

/// Everything the presentation layer needs to draw one view.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum ViewModel {
    BusinessUnderstanding,
    DataOverview(DataOverview),
    Target(TargetSummary),
    Numeric(NumericDistribution),
    Categorical(CategoryBreakdown),
    Country(Vec<CountryCancellation>),
    Correlation(CorrelationMatrix),
    Placeholder { message: String },
}

/// Answers view requests against one loaded dataset.
pub struct Dashboard {
    dataset: Arc<Dataset>,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>, config: DashboardConfig) -> Self {
        Self { dataset, config }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn respond(&self, request: &ViewRequest) -> ViewModel {
        tracing::debug!(?request, "Handling view request");

        let result = match request {
            ViewRequest::BusinessUnderstanding => Ok(ViewModel::BusinessUnderstanding),
            ViewRequest::DataOverview => {
                OverviewBuilder::build(&self.dataset, self.config.preview_rows)
                    .map(ViewModel::DataOverview)
            }
            ViewRequest::Analysis(tab) => self.analyse(tab),
        };

        result.unwrap_or_else(|err| {
            match &err {
                AggregateError::InsufficientData(_) => {
                    tracing::warn!(?request, error = %err, "View has no data to show")
                }
                _ => tracing::error!(?request, error = %err, "View aggregation failed"),
            }
            ViewModel::Placeholder {
                message: err.to_string(),
            }
        })
    }

    fn analyse(&self, tab: &AnalysisTab) -> Result<ViewModel, AggregateError> {
        let df = &self.dataset.cleaned;
        match tab {
            AnalysisTab::Target => TargetAggregator::aggregate(df).map(ViewModel::Target),
            AnalysisTab::Numeric(feature) => {
                NumericAggregator::aggregate(df, feature.column(), self.config.histogram_buckets)
                    .map(ViewModel::Numeric)
            }
            AnalysisTab::Categorical(feature) => {
                CategoricalAggregator::aggregate(df, feature.column()).map(ViewModel::Categorical)
            }
            AnalysisTab::Country => {
                CountryAggregator::aggregate(df, self.config.top_countries).map(ViewModel::Country)
            }
            AnalysisTab::Correlation => {
                CorrelationAggregator::aggregate(df).map(ViewModel::Correlation)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn empty_dashboard() -> Dashboard {
        let raw = df!(
            "is_canceled" => Vec::<i64>::new(),
            "country" => Vec::<&str>::new(),
            "booking_changes" => Vec::<i64>::new(),
        )
        .unwrap();
        let dataset = Dataset::from_raw("empty.csv", raw).unwrap();
        Dashboard::new(Arc::new(dataset), DashboardConfig::default())
    }

    #[test]
    fn insufficient_data_becomes_placeholder() {
        let dashboard = empty_dashboard();
        let view = dashboard.respond(&ViewRequest::Analysis(AnalysisTab::Target));
        assert!(matches!(view, ViewModel::Placeholder { .. }));
    }

    #[test]
    fn failing_view_does_not_affect_others() {
        let dashboard = empty_dashboard();
        let broken = dashboard.respond(&ViewRequest::Analysis(AnalysisTab::Correlation));
        assert!(matches!(broken, ViewModel::Placeholder { .. }));

        let country = dashboard.respond(&ViewRequest::Analysis(AnalysisTab::Country));
        assert!(matches!(country, ViewModel::Country(ref c) if c.is_empty()));
        assert!(matches!(
            dashboard.respond(&ViewRequest::BusinessUnderstanding),
            ViewModel::BusinessUnderstanding
        ));
    }

    #[test]
    fn all_tabs_enumerates_selectors() {
        let tabs = AnalysisTab::all();
        assert_eq!(tabs.len(), 11);
        assert_eq!(tabs[0], AnalysisTab::Target);
        assert_eq!(tabs[10], AnalysisTab::Correlation);
    }
}
