use chrono::{Duration, NaiveDate};
use demand_forecast::align::TrainingSchema;
use demand_forecast::data::{DataLoader, SalesRecord};
use demand_forecast::features::RecursiveFeatureGenerator;
use demand_forecast::forecaster::DemandForecaster;
use demand_forecast::model::LinearModel;
use std::collections::HashMap;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Demand Forecast: Basic Forecasting Example");
    println!("==========================================\n");

    // Create a year of synthetic history for store 1, item 1
    println!("Creating sample history...");
    let history = create_sample_history();
    println!("Sample history created: {} daily rows\n", history.len());

    // In production these three artifacts come from the training run; here
    // we build small stand-ins by hand
    let columns = vec![
        "is_wknd".to_string(),
        "day_of_month".to_string(),
        "sales_lag_91".to_string(),
        "sales_ewm_alpha_095_lag_91".to_string(),
    ];
    let mut global_means = HashMap::new();
    global_means.insert("sales_lag_91".to_string(), 2.9);
    global_means.insert("sales_ewm_alpha_095_lag_91".to_string(), 2.9);

    let schema = TrainingSchema::new(columns, global_means)?;
    let model = LinearModel::new(vec![0.15, 0.0, 0.25, 0.65], 0.35)?;

    // Forecast two weeks ahead
    println!("Running a 14-day forecast for store 1, item 1...\n");
    let mut forecaster = DemandForecaster::new(model, schema, RecursiveFeatureGenerator::new());
    let points = forecaster.forecast(&history, 1, 1, 14)?;

    println!("{:<12} {:>10} {:>12}", "date", "pred(log)", "pred(sales)");
    for point in &points {
        println!(
            "{:<12} {:>10.4} {:>12.2}",
            point.date, point.pred_log, point.pred
        );
    }

    println!("\nForecasting complete!");
    Ok(())
}

fn create_sample_history() -> demand_forecast::data::SalesHistory {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let records = (0..365)
        .map(|i| {
            let date = start + Duration::days(i);
            // Weekly cycle around a base level of 18 units
            let weekly = 4.0 * ((i % 7) as f64 / 7.0 * std::f64::consts::TAU).sin();
            SalesRecord {
                date,
                store: 1,
                item: 1,
                sales: (18.0 + weekly).max(0.0),
            }
        })
        .collect();

    DataLoader::from_records(records)
}
