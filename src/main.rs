//! Calculator tool server.
//!
//! Registers a calculator service, then serves it over the transport
//! selected by the environment (STDIO by default).

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use mcp_toolkit::core::config::LoggingConfig;
use mcp_toolkit::core::{Config, McpServer, TransportService};
use mcp_toolkit::domains::tools::{Arguments, ServiceTools, ToolService, Validator};

/// Four basic arithmetic operations.
struct Calculator;

impl Calculator {
    fn operands(args: &Arguments) -> Result<(f64, f64)> {
        Ok((args.get(0)?, args.get(1)?))
    }
}

impl ToolService for Calculator {
    fn define_tools(tools: &mut ServiceTools<'_, Self>) {
        tools
            .method("add")
            .tool("Add two numbers")
            .param_described(0, "a", Validator::number(), "First number")
            .param_described(1, "b", Validator::number(), "Second number")
            .sync_handler(|_: &Calculator, args: Arguments| {
                Calculator::operands(&args).map(|(a, b)| a + b)
            });

        tools
            .method("subtract")
            .tool("Subtract b from a")
            .param_described(0, "a", Validator::number(), "Number to subtract from")
            .param_described(1, "b", Validator::number(), "Number to subtract")
            .sync_handler(|_: &Calculator, args: Arguments| {
                Calculator::operands(&args).map(|(a, b)| a - b)
            });

        tools
            .method("multiply")
            .tool("Multiply two numbers")
            .param_described(0, "a", Validator::number(), "First factor")
            .param_described(1, "b", Validator::number(), "Second factor")
            .sync_handler(|_: &Calculator, args: Arguments| {
                Calculator::operands(&args).map(|(a, b)| a * b)
            });

        tools
            .method("divide")
            .tool("Divide a by b")
            .param_described(0, "a", Validator::number(), "Dividend")
            .param_described(1, "b", Validator::number(), "Divisor, must not be zero")
            .sync_handler(|_: &Calculator, args: Arguments| -> Result<f64> {
                let (a, b) = Calculator::operands(&args)?;
                if b == 0.0 {
                    anyhow::bail!("Division by zero");
                }
                Ok(a / b)
            });
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let transport = TransportService::new(config.transport.clone());

    let mut server = McpServer::new(config);
    server.register(Calculator)?;

    info!("Server initialized with tools: {:?}", server.registry().tool_names());

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout carries the protocol in STDIO mode.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
