//! Headless report over one selection of an uploaded dump.
//!
//! ```bash
//! THREADSCOPE_FILE=dump.zip THREADSCOPE_HOUR=10 THREADSCOPE_MINUTES=10:05,10:10 \
//!   THREADSCOPE_STATE=BLOCKED cargo run --bin threadscope-report
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod report {
    use analytics_client::config::{ClientConfig, ReportConfig};
    use analytics_client::http::ReqwestTransport;
    use analytics_client::{
        Aggregator, AnalyticsClient, AnalyticsView, PageOutcome, Paginator,
        Selection, SummaryLoader, TraceKey, Transport, ViewController,
    };
    use tracing::{info, warn};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    pub async fn run() -> anyhow::Result<()> {
        tracing_subscriber::registry()
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "threadscope_report=info,analytics_client=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();

        let config = ClientConfig::from_env()?;
        let report = ReportConfig::from_env()?;
        info!(base_url = %config.base_url, file = %report.file_name, "threadscope report starting");

        let selection = Selection::new(report.file_name.clone(), report.hour, report.minutes.clone())?;
        let controller = ViewController::new(selection);
        let client = AnalyticsClient::new(ReqwestTransport::new(&config)?);

        match controller.active_view() {
            AnalyticsView::Comparative => print_comparison(&client, &controller, config.top_pools).await,
            AnalyticsView::Single => print_summary(&client, &controller).await,
        }

        if let Some(state) = report.state {
            let key = TraceKey {
                file_name: controller.selection().file_name().to_string(),
                minutes: controller.selection().minutes().to_vec(),
                state,
            };
            print_traces(&client, key, report.max_pages).await;
        }
        Ok(())
    }

    async fn print_summary<T: Transport>(client: &AnalyticsClient<T>, controller: &ViewController) {
        let mut loader = SummaryLoader::new();
        loader
            .refresh(
                client,
                controller.selection().file_name(),
                &controller.single_timestamp_minutes(),
            )
            .await;

        let state = loader.state();
        let Some(summary) = state.data() else {
            println!("{}", state.error().unwrap_or(analytics_client::summary::NO_DATA_MESSAGE));
            return;
        };

        println!("Thread summary at {}", controller.active_timestamp());
        println!("  total threads   {}", summary.total_threads);
        println!(
            "  daemon          {} ({:.1}%)",
            summary.daemon_thread_count, summary.daemon_thread_percentage
        );
        println!(
            "  non-daemon      {} ({:.1}%)",
            summary.non_daemon_thread_count, summary.non_daemon_thread_percentage
        );
        for entry in &summary.thread_states {
            println!("  {:<15} {} ({:.1}%)", entry.state, entry.count, entry.percentage);
        }
    }

    async fn print_comparison<T: Transport>(
        client: &AnalyticsClient<T>,
        controller: &ViewController,
        top_pools: usize,
    ) {
        let selection = controller.selection();
        let mut aggregator = Aggregator::with_top_pools(top_pools);
        aggregator
            .refresh(client, selection.file_name(), selection.minutes())
            .await;

        if let Some(error) = aggregator.error() {
            warn!(error, "comparison incomplete");
            println!("{error}");
        }

        if let Some(table) = aggregator.comparison_table() {
            print!("{:<15}", "State");
            for timestamp in table.timestamps() {
                print!(" {timestamp:>8}");
            }
            println!();
            for row in table.rows() {
                print!("{:<15}", row.state);
                for count in &row.counts {
                    print!(" {count:>8}");
                }
                println!();
            }
        }

        if let Some(rows) = aggregator.state_timeline() {
            println!();
            println!("Thread states over time");
            for row in rows {
                println!("  {:<40} {}", row.thread_name, row.states.join(" -> "));
            }
        }

        if let Some(pools) = aggregator.top_pools() {
            println!();
            println!("Top {} thread pools", pools.len());
            for pool in pools {
                let counts: Vec<String> = pool.counts.iter().map(u64::to_string).collect();
                println!("  {:<40} peak {:>5}  [{}]", pool.name, pool.peak, counts.join(", "));
            }
        }
    }

    async fn print_traces<T: Transport>(client: &AnalyticsClient<T>, key: TraceKey, max_pages: u32) {
        let state = key.state.clone();
        let mut paginator = Paginator::new();
        let mut next = paginator.select(key);
        let mut pages = 0;

        while let Some(request) = next.take() {
            if pages >= max_pages {
                info!(max_pages, "page cap reached");
                break;
            }
            pages += 1;
            match paginator.run(client, request).await {
                PageOutcome::Appended(_) => next = paginator.on_viewport_signal(),
                PageOutcome::Exhausted | PageOutcome::Stale => {}
                PageOutcome::Failed => {
                    println!("{}", paginator.last_error().unwrap_or("Failed to load stack traces"));
                }
            }
        }

        println!();
        println!("{} traces in state {state}", paginator.traces().len());
        for trace in paginator.traces() {
            println!("{trace}");
            println!();
        }
        if paginator.has_more() && paginator.last_error().is_none() {
            println!("(more pages available)");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    report::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {}
