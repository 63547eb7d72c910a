use approx::assert_relative_eq;
use forecast_math::{ArimaOrder, LinearTrend};
use mineral_forecast::data::{ObservationSeries, YearRange};
use mineral_forecast::mineral::{ForecasterKind, MineralId, MineralSpec};
use mineral_forecast::models::{ArimaModel, ForecastModel, LinearTrendModel, TrainedForecastModel};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rstest::rstest;

fn growing_series(len: usize, seed: u64) -> ObservationSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 4.0).unwrap();
    let values = (0..len)
        .map(|i| {
            let t = i as f64;
            (200.0 + 6.0 * t + 0.3 * t * t + noise.sample(&mut rng)).max(0.0)
        })
        .collect();
    ObservationSeries::new(1950, values).unwrap()
}

#[test]
fn test_gallium_trend_values() {
    let model = LinearTrendModel::new(2022, 540.0, 35.3).unwrap();
    let trained = model.train(&ObservationSeries::new(2016, vec![500.0; 8]).unwrap()).unwrap();
    let forecast = trained.predict(YearRange::new(2022, 2057).unwrap()).unwrap();

    assert_eq!(forecast.len(), 36);
    assert_relative_eq!(forecast.values()[0], 540.0);
    assert_relative_eq!(forecast.values()[1], 575.3, epsilon = 1e-9);
    assert_relative_eq!(forecast.values()[35], 1775.5, epsilon = 1e-9);
    assert!(trained.summary().is_none());
}

#[rstest]
#[case(2001, 2001)]
#[case(1990, 2005)]
#[case(2000, 2020)]
fn test_arima_prediction_count(#[case] start: i32, #[case] end: i32) {
    let series = growing_series(60, 11);
    let trained = ArimaModel::new(1, 1, 1).unwrap().train(&series).unwrap();

    let forecast = trained.predict(YearRange::new(start, end).unwrap()).unwrap();

    assert_eq!(forecast.len(), (end - start + 1) as usize);
    assert_eq!(forecast.years().first(), Some(&start));
    assert_eq!(forecast.years().last(), Some(&end));
    assert!(forecast.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_arima_fit_is_deterministic() {
    let series = growing_series(60, 3);
    let model = ArimaModel::new(2, 1, 1).unwrap();
    let range = YearRange::new(2005, 2030).unwrap();

    let first = model.train(&series).unwrap().predict(range).unwrap();
    let second = model.train(&series).unwrap().predict(range).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_arima_summary_names() {
    let series = growing_series(60, 5);
    let trained = ArimaModel::new(2, 1, 1).unwrap().train(&series).unwrap();
    let summary = trained.summary().unwrap();

    let names: Vec<&str> = summary.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["ar.L1", "ar.L2", "ma.L1", "sigma2"]);
    assert_eq!(summary.nobs, 60);
    assert_eq!(summary.sample_start, 1950);
    assert_eq!(summary.sample_end, 2009);
    assert!(summary.aic.is_finite());
}

#[test]
fn test_forecaster_kind_trains_trait_objects() {
    let series = growing_series(60, 8);
    let range = YearRange::new(2010, 2015).unwrap();

    let kinds = [
        ForecasterKind::Arima(ArimaOrder::new(1, 1, 0)),
        ForecasterKind::LinearTrend(LinearTrend::new(2010, 100.0, 1.0).unwrap()),
    ];
    let models: Vec<Box<dyn TrainedForecastModel>> =
        kinds.iter().map(|k| k.train(&series).unwrap()).collect();

    assert_eq!(models[0].name(), "ARIMA(1,1,0)");
    for model in &models {
        assert_eq!(model.predict(range).unwrap().len(), 6);
    }
    assert!(models[0].summary().is_some());
    assert!(models[1].summary().is_none());
}

#[test]
fn test_catalog_arima_needs_long_series() {
    let spec = MineralSpec::by_id(MineralId::Lithium).unwrap();
    let short = growing_series(20, 1);
    assert!(spec.forecaster.train(&short).is_err());
}
