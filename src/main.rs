use anyhow::Result;
use clap::Parser;

mod aggregate;
mod cli;
mod collect;
mod csvio;
mod github;
mod model;
mod normalize;
mod pipeline;
mod util;

use crate::cli::{normalize, Cli};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 0: pick up GITHUB_TOKEN etc. from ./.env; real env vars win
  let dotenv = dotenvy::dotenv();
  util::init_tracing();
  util::report_dotenv(dotenv);

  // Phase 1: normalize CLI (token discovery, since validation)
  let cfg = normalize(cli)?;

  // Phase 2: collect and/or aggregate
  crate::pipeline::process(&cfg)
}
