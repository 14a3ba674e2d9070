// Copyright 2025 jonefeewang@gmail.com
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
use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use tokio::runtime;
use tracing::error;

use stonemeta::request::{
    ApiRequest, ApiResponse, CreatableTopic, CreateTopicsRequest, DeleteTopicsRequest, ErrorCode,
};
use stonemeta::{
    setup_local_tracing, setup_tracing, AppError, AppResult, BrokerConfig, InMemoryBatchStore,
    MetaServer, TopicConfigEntry, GLOBAL_CONFIG,
};

#[derive(Parser)]
#[command(version)]
pub struct CommandLine {
    /// path to config file
    #[arg(short, long)]
    pub conf: Option<String>,
    /// also write hourly rolling log files into this directory
    #[arg(long)]
    pub log_dir: Option<String>,
    #[command(subcommand)]
    pub command: Command,
    /// log level (v: info, vv: debug, vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Parser)]
pub enum Command {
    PrintConfig,
    CreateTopic {
        name: String,
        #[arg(short, long)]
        partitions: i32,
        /// topic config override, key=value
        #[arg(short, long = "config", value_parser = parse_config_entry)]
        config: Vec<TopicConfigEntry>,
    },
    DeleteTopic {
        #[arg(required = true)]
        names: Vec<String>,
    },
    ListTopics,
}

fn parse_config_entry(arg: &str) -> Result<TopicConfigEntry, String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", arg))?;
    Ok(TopicConfigEntry::new(key, value))
}

fn main() -> AppResult<()> {
    dotenv().ok();

    let commandline: CommandLine = CommandLine::parse();
    let log_guard = match commandline.log_dir.as_deref() {
        Some(log_dir) => Some(setup_tracing(log_dir, commandline.verbose)),
        None => {
            setup_local_tracing(commandline.verbose)?;
            None
        }
    };

    let config_path = commandline.conf.as_ref().map_or_else(
        || {
            let mut path = PathBuf::from("./");
            path.push("conf.toml");
            path
        },
        PathBuf::from,
    );
    // config path comes from the command line, so the cell is set here
    let broker_config = BrokerConfig::set_up_config(config_path)?;
    GLOBAL_CONFIG
        .set(broker_config)
        .map_err(|_| AppError::IllegalStateError("broker config already set".to_string()))?;
    let config = stonemeta::global_config();

    let command = match commandline.command {
        Command::PrintConfig => {
            println!("{}", serde_json::to_string_pretty(config)?);
            return Ok(());
        }
        Command::ListTopics => {
            let server = MetaServer::start(config, Arc::new(InMemoryBatchStore::new()))?;
            for topic in server.topic_meta_store().get_all_topics() {
                println!("{}", serde_json::to_string(&topic)?);
            }
            return Ok(());
        }
        Command::CreateTopic {
            name,
            partitions,
            config: configs,
        } => ApiRequest::CreateTopics(CreateTopicsRequest {
            topics: vec![CreatableTopic {
                name,
                num_partitions: partitions,
                configs,
            }],
        }),
        Command::DeleteTopic { names } => {
            ApiRequest::DeleteTopics(DeleteTopicsRequest { topic_names: names })
        }
    };

    let rt = runtime::Builder::new_current_thread().enable_all().build()?;
    let server = MetaServer::start(config, Arc::new(InMemoryBatchStore::new()))?;
    let mut failed = false;
    match rt.block_on(server.process_request(command)) {
        ApiResponse::CreateTopics(response) => {
            for topic in response.topics {
                if topic.error_code == ErrorCode::None as i16 {
                    println!("created topic {}", topic.name);
                } else {
                    failed = true;
                    error!(
                        "create topic {} failed: {} {}",
                        topic.name,
                        ErrorCode::from_code(topic.error_code).message(),
                        topic.error_message.unwrap_or_default()
                    );
                }
            }
        }
        ApiResponse::DeleteTopics(response) => {
            for topic in response.responses {
                if topic.error_code == ErrorCode::None as i16 {
                    println!("deleted topic {}", topic.name);
                } else {
                    failed = true;
                    error!(
                        "delete topic {} failed: {}",
                        topic.name,
                        ErrorCode::from_code(topic.error_code).message()
                    );
                }
            }
        }
        ApiResponse::GetOffsets(_) => {}
    }
    if failed {
        // exit skips destructors, flush the file writer first
        drop(log_guard);
        std::process::exit(1);
    }
    Ok(())
}
