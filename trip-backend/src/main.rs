use dotenv::dotenv;
use std::sync::Arc;
use trip_backend::ai::{NoSearch, SearchProvider, TavilySearch};
use trip_backend::{Config, TripPlanner, TripRequest};

fn usage() -> ! {
    eprintln!("Usage: trip-backend <destination> <duration> [budget] [interests]");
    eprintln!("Example: trip-backend \"Tokyo, Japan\" \"7 days\" moderate \"food, culture\"");
    std::process::exit(2);
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let mut args = std::env::args().skip(1);
    let destination = args.next().unwrap_or_else(|| usage());
    let duration = args.next().unwrap_or_else(|| usage());

    let mut request = TripRequest::new(destination, duration);
    if let Some(budget) = args.next() {
        request = request.with_budget(budget);
    }
    if let Some(interests) = args.next() {
        request = request.with_interests(interests);
    }

    let search: Arc<dyn SearchProvider> = match &config.tavily_api_key {
        Some(key) => {
            log::info!("Search capability: Tavily");
            Arc::new(TavilySearch::new(key.clone()))
        }
        None => {
            log::info!("Search capability: none, tools run on LLM fallback");
            Arc::new(NoSearch)
        }
    };

    let planner = match TripPlanner::new(&config, search) {
        Ok(planner) => planner,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    match planner.run(request).await {
        Ok(outcome) => {
            println!("{}", outcome.itinerary);
            if !outcome.tool_calls.is_empty() {
                println!("\n--- Tool calls ---");
                for record in &outcome.tool_calls {
                    println!("[{}] {} {}", record.agent, record.tool, record.args);
                }
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
