use std::sync::Arc;

use chordring_node::logging::init_logging;
use chordring_node::logging::LogLevel;
use chordring_node::native::cli::Client;
use chordring_node::native::config;
use chordring_node::native::endpoint::run_http_api;
use chordring_node::prelude::chordring_rpc::types::Timeout;
use chordring_node::prelude::IdSpace;
use chordring_node::processor::ProcessorBuilder;
use chordring_node::processor::ProcessorConfig;
use chordring_node::util::expand_home;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(about, version, author)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, default_value_t = LogLevel::Info, value_enum, env)]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    #[command(about = "Writes a node configuration file.")]
    Init(InitCommand),
    #[command(about = "Starts a long-running node daemon.")]
    Run(RunCommand),
    #[command(about = "Shows identity of a node.")]
    Info(ClientArgs),
    #[command(about = "Shows predecessor of a node.")]
    Pred(ClientArgs),
    #[command(about = "Shows successor of a node.")]
    Succ(ClientArgs),
    #[command(about = "Resolves the node owning an id.")]
    Find(FindCommand),
    #[command(about = "Reads the values of a key from its owner.")]
    Get(GetCommand),
    #[command(about = "Binds a value to a key at its owner.")]
    Add(KeyValueCommand),
    #[command(about = "Removes a binding of a key at its owner.")]
    Delete(KeyValueCommand),
    #[command(about = "Shows state, successor, predecessor, finger table and storage of a node.")]
    Inspect(ClientArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[arg(
        long,
        short = 'c',
        env,
        default_value = config::DEFAULT_CONFIG_PATH,
        help = "Config file location"
    )]
    pub config: String,
}

impl ConfigArgs {
    /// Missing file means default configuration.
    fn load(&self) -> anyhow::Result<config::Config> {
        if expand_home(&self.config)?.exists() {
            Ok(config::Config::read_fs(&self.config)?)
        } else {
            tracing::warn!("{} not found, use default configuration", self.config);
            Ok(config::Config::default())
        }
    }
}

#[derive(Args, Debug)]
struct NodeArgs {
    #[arg(long, help = "Bits of the identifier space", env)]
    pub id_bits: Option<u8>,

    #[arg(
        long,
        help = "Position on the ring. If not provided, hash of the external url",
        env
    )]
    pub node_id: Option<u64>,

    #[arg(long, help = "Advertised address of the node", env)]
    pub external_url: Option<String>,

    #[arg(
        long,
        short = 'i',
        help = "Url of a ring member to join. If not provided, a new ring is created",
        env
    )]
    pub introducer: Option<String>,
}

impl NodeArgs {
    fn apply(self, c: &mut config::Config) {
        if let Some(v) = self.id_bits {
            c.id_bits = v;
        }
        if let Some(v) = self.node_id {
            c.node_id = Some(v);
        }
        if let Some(v) = self.external_url {
            c.external_url = v;
        }
        if let Some(v) = self.introducer {
            c.introducer = Some(v);
        }
    }
}

#[derive(Args, Debug)]
struct InitCommand {
    #[arg(
        long,
        default_value = config::DEFAULT_CONFIG_PATH,
        help = "The location of config file"
    )]
    pub location: String,

    #[command(flatten)]
    node_args: NodeArgs,
}

#[derive(Args, Debug)]
struct RunCommand {
    #[arg(
        long,
        short = 'b',
        help = "Listen address. If not provided, use bind_addr in config file or 127.0.0.1:50000",
        env
    )]
    pub bind_addr: Option<String>,

    #[arg(long, help = "Stabilize period in milliseconds", env)]
    pub stabilize_interval_ms: Option<u64>,

    #[arg(long, help = "Fix fingers period in milliseconds", env)]
    pub fix_fingers_interval_ms: Option<u64>,

    #[command(flatten)]
    node_args: NodeArgs,

    #[command(flatten)]
    config_args: ConfigArgs,
}

#[derive(Args, Debug)]
struct ClientArgs {
    #[arg(
        long,
        short = 'u',
        help = "Node endpoint url. If not provided, use external_url in config file",
        env
    )]
    endpoint_url: Option<String>,

    #[command(flatten)]
    config_args: ConfigArgs,
}

impl ClientArgs {
    fn new_client(&self) -> anyhow::Result<Client> {
        let c = self.config_args.load()?;
        let endpoint_url = self.endpoint_url.as_ref().unwrap_or(&c.external_url);
        Client::new(
            endpoint_url.as_str(),
            IdSpace::new(c.id_bits)?,
            Timeout::from(c.request_timeout_ms),
        )
    }
}

#[derive(Args, Debug)]
struct FindCommand {
    #[command(flatten)]
    client_args: ClientArgs,

    id: u64,
}

#[derive(Args, Debug)]
struct GetCommand {
    #[command(flatten)]
    client_args: ClientArgs,

    key: String,
}

#[derive(Args, Debug)]
struct KeyValueCommand {
    #[command(flatten)]
    client_args: ClientArgs,

    key: String,

    value: String,
}

fn init_run(args: InitCommand) -> anyhow::Result<()> {
    let mut c = config::Config::default();
    args.node_args.apply(&mut c);
    let path = c.write_fs(&args.location)?;
    println!("Your config file is saved to: {}", path);
    Ok(())
}

async fn daemon_run(args: RunCommand) -> anyhow::Result<()> {
    let mut c = args.config_args.load()?;
    args.node_args.apply(&mut c);
    if let Some(v) = args.bind_addr {
        c.bind_addr = v;
    }
    if let Some(v) = args.stabilize_interval_ms {
        c.stabilize_interval_ms = v;
    }
    if let Some(v) = args.fix_fingers_interval_ms {
        c.fix_fingers_interval_ms = v;
    }

    let bind_addr = c.bind_addr.clone();
    let processor_config = ProcessorConfig::try_from(c)?;
    let processor = Arc::new(ProcessorBuilder::from_config(processor_config).build()?);
    println!("Node: {}", processor.swarm.info());

    let server = tokio::spawn({
        let processor = processor.clone();
        async move { run_http_api(&bind_addr, processor).await }
    });

    processor.join_or_create().await?;
    processor.listen()?;

    tokio::select! {
        res = tokio::signal::ctrl_c() => res?,
        res = server => res??,
    }
    processor.shutdown().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Command::Init(args) => init_run(args),
        Command::Run(args) => daemon_run(args).await,
        Command::Info(args) => {
            args.new_client()?.node_info().await?.display();
            Ok(())
        }
        Command::Pred(args) => {
            args.new_client()?.pred().await?.display();
            Ok(())
        }
        Command::Succ(args) => {
            args.new_client()?.succ().await?.display();
            Ok(())
        }
        Command::Find(args) => {
            args.client_args
                .new_client()?
                .find(args.id)
                .await?
                .display();
            Ok(())
        }
        Command::Get(args) => {
            args.client_args
                .new_client()?
                .get(args.key.as_str())
                .await?
                .display();
            Ok(())
        }
        Command::Add(args) => {
            args.client_args
                .new_client()?
                .add(args.key.as_str(), args.value.as_str())
                .await?
                .display();
            Ok(())
        }
        Command::Delete(args) => {
            args.client_args
                .new_client()?
                .delete(args.key.as_str(), args.value.as_str())
                .await?
                .display();
            Ok(())
        }
        Command::Inspect(args) => {
            args.new_client()?.inspect().await?.display();
            Ok(())
        }
    }
}
