use studyhub::{Config, run};

fn main() -> anyhow::Result<()> {
    // Thread count comes from config, so the runtime is built by hand.
    let worker_threads = Config::load()?.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    builder.build()?.block_on(run())
}
