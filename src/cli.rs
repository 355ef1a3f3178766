// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_content;
use crate::cmd::copyrights::print_copyrights;
use crate::cmd::drill::server::ServeOptions;
use crate::cmd::drill::server::start_server;
use crate::cmd::orphans::list_orphans;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Drill the cards in a browser.
    Drill {
        /// Path to the content directory. Defaults to the current directory.
        directory: Option<String>,
        /// The host address to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Don't open the browser automatically.
        #[arg(long)]
        no_open: bool,
        /// Write a JSON report here when every card has been answered.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Check that the configuration is valid and every local image exists.
    Check {
        /// Path to the content directory. Defaults to the current directory.
        directory: Option<String>,
    },
    /// Print the image credits as JSON.
    Copyrights {
        /// Path to the content directory. Defaults to the current directory.
        directory: Option<String>,
        /// Prefix for image URLs.
        #[arg(long, default_value = "")]
        base_url: String,
    },
    /// List image files that no card references.
    Orphans {
        /// Path to the content directory. Defaults to the current directory.
        directory: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            directory,
            host,
            port,
            no_open,
            report,
        } => {
            let options = ServeOptions {
                host,
                port,
                open_browser: !no_open,
                report,
            };
            start_server(directory, options).await
        }
        Command::Check { directory } => check_content(directory),
        Command::Copyrights {
            directory,
            base_url,
        } => print_copyrights(directory, &base_url),
        Command::Orphans { directory } => list_orphans(directory),
    }
}
