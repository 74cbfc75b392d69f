use chrono::{Duration, NaiveDate};
use petrol_analytics::models::linear_trend::LinearTrend;
use petrol_analytics::models::{ForecastModel, SpendHistory, TrainedForecastModel};
use petrol_analytics::{calculate_kpis, get_insights, DataLoader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Petrol Analytics: Basic Forecasting Example");
    println!("===========================================\n");

    // Build a sample purchase log in CSV form
    let csv = create_sample_csv();
    let table = DataLoader::from_csv_str(&csv)?;
    println!("Loaded {} purchases\n", table.len());

    let kpis = calculate_kpis(&table);
    println!("Total spent:        R{:.2}", kpis.total_spent);
    println!("Average per litre:  R{:.2}", kpis.avg_price_per_litre);
    println!("Visits per month:   {:.1}\n", kpis.monthly_visits);

    for insight in get_insights(&table) {
        println!("- {insight}");
    }

    // Fit the trend directly rather than through `predict`
    let history = SpendHistory::from_table(&table);
    let model = LinearTrend::new();
    let trained = model.train(&history)?;
    let fit = trained.fit();
    println!(
        "\n{}: slope R{:.2}/day, intercept R{:.2}",
        model.name(),
        fit.slope,
        fit.intercept
    );

    let forecast = trained.forecast(14)?;
    println!("\nNext 14 days:");
    for point in forecast.points() {
        println!("  {}  R{:.2}", point.date, point.predicted_price);
    }
    println!("\nTotal expected: R{:.2}", forecast.total());

    Ok(())
}

/// Weekly fill-ups over six months with a slowly rising fuel price
fn create_sample_csv() -> String {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default();
    let stations = ["Shell", "BP", "Engen"];

    let mut csv = String::from("Date,Station,Price,Litres\n");
    for week in 0..26_i64 {
        let date = start + Duration::days(week * 7);
        let litres = 35.0 + (week % 4) as f64 * 2.5;
        let per_litre = 21.0 + week as f64 * 0.05;
        let station = stations[(week % 3) as usize];
        csv.push_str(&format!(
            "{},{},{:.2},{:.1}\n",
            date,
            station,
            litres * per_litre,
            litres
        ));
    }
    csv
}
