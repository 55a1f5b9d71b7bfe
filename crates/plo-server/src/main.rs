use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::web;
use clap::Parser;
use plo_gameplay::Rake;
use plo_gameroom::TimerConfig;
use plo_hosting::Lobby;
use plo_hosting::Maintenance;
use plo_hosting::routes;
use tokio::sync::mpsc;

/// PLO cash-game service.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Bind address for the HTTP/WebSocket server.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,
    /// Seed for the matchmaker's PRNG; table decks derive from it.
    #[arg(long)]
    seed: Option<u64>,
    /// Disable rake (play-money mode).
    #[arg(long)]
    no_rake: bool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = Args::parse();
    let rake = match args.no_rake {
        true => Rake::none(),
        false => Rake::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    // the storage layer is a sink: hand records are emitted here and
    // handed to whatever persistence consumer is attached downstream
    let (records, mut record_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(record) = record_rx.recv().await {
            match serde_json::to_string(&record) {
                Ok(json) => log::info!("[records] {}", json),
                Err(e) => log::error!("[records] unserializable record: {}", e),
            }
        }
    });

    let lobby = Lobby::spawn(records, rake, TimerConfig::default(), seed);
    let maintenance = Maintenance::default();
    log::info!("[server] listening on {}", args.bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(lobby.clone()))
            .app_data(web::Data::new(maintenance.clone()))
            .configure(routes)
    })
    .bind(&args.bind)?
    .run()
    .await
}
