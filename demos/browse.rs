use climogram::{ClimogramError, Dashboard, DatasetView, DirTransport, DashboardConfig};
use std::env;

/// Browses a local copy of the published site:
///
/// `cargo run --example browse -- <site dir> <query> [year]`
#[tokio::main]
async fn main() -> Result<(), ClimogramError> {
    env_logger::init();
    let mut args = env::args().skip(1);
    let root = args.next().unwrap_or_else(|| ".".to_string());
    let query = args.next().unwrap_or_else(|| "brasília".to_string());
    let year = args.next().and_then(|y| y.parse::<i32>().ok());

    let dashboard = Dashboard::builder()
        .transport(DirTransport::new(root))
        .config(DashboardConfig::default())
        .build()
        .await?;

    let listing = dashboard.on_query_changed(&query);
    println!("{} matches for '{}'", listing.total_matches, query);
    for station in &listing.stations {
        println!("  {} {} ({})", station.id, station.name, station.uf);
    }

    let Some(first) = listing.stations.first() else {
        return Ok(());
    };
    dashboard.on_station_selected(&first.id).await;
    if let Some(year) = year {
        dashboard.on_year_changed(year).await;
    }

    match dashboard.view().dataset {
        DatasetView::Ready(loaded) => {
            for card in &loaded.insights.cards {
                println!("{}: {}", card.label, card.display);
            }
            for line in loaded.insights.narrative() {
                println!("{}", line);
            }
            if let Some(export) = dashboard.export_csv()? {
                println!("\n{}\n{}", export.filename, export.content);
            }
        }
        DatasetView::NotFound { url, .. } => println!("Dataset not found: {}", url),
        other => println!("{:?}", other),
    }

    Ok(())
}
