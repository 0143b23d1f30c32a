mod remotes;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use verbtree_core::{
    BoundArgs, CancellationToken, Command, CommandTree, Handler, HandlerError, Param, ParameterSet,
    TreeSchema, VerbGroup,
};
use verbtree_runtime::{DEFAULT_ERROR_EXIT_CODE, Dispatcher, DispatcherConfig, Host};

use crate::remotes::{Remote, RemoteStore};

const PROGRAM_NAME: &str = "verbtree-demo";

/// Environment variable naming an optional YAML settings file.
const CONFIG_ENV: &str = "VERBTREE_CONFIG";

/// Exit code of `wait` when interrupted.
const EXIT_CANCELLED: i32 = 130;

#[tokio::main]
async fn main() {
    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => match DispatcherConfig::load_or_default(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: failed to load '{}': {err}", PathBuf::from(path).display());
                std::process::exit(DEFAULT_ERROR_EXIT_CODE);
            }
        },
        None => DispatcherConfig::default(),
    };

    let host = Host::initialize(&config);
    let dispatcher = match Dispatcher::new(build_root(), config) {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            eprintln!("error: invalid command tree: {err}");
            std::process::exit(DEFAULT_ERROR_EXIT_CODE);
        }
    };

    let code = dispatcher.run(std::env::args().skip(1), host.cancellation()).await;
    host.shutdown();
    std::process::exit(code);
}

fn build_root() -> VerbGroup {
    VerbGroup::new(PROGRAM_NAME)
        .description("Sample tool declared with verbtree")
        .child(greet_command())
        .child(check_command())
        .child(wait_command())
        .child(remote_group())
        .child(schema_command())
}

fn greet_command() -> Command {
    let name = Param::<String>::positional("name", 0)
        .help("Who to greet")
        .build();
    let loud = Param::<bool>::named("--loud")
        .alias("-l")
        .help("Shout the greeting")
        .build();
    let times = Param::<u32>::named("--times")
        .alias("-n")
        .default_value(1)
        .help("How many times to greet")
        .build();

    let (n, l, t) = (name.clone(), loud.clone(), times.clone());
    Command::new("greet")
        .alias("hi")
        .description("Print a greeting")
        .param(&name)
        .param(&loud)
        .param(&times)
        .handler_sync(move || {
            let mut line = format!("Hello, {}!", n.value().unwrap_or_default());
            if l.value().unwrap_or(false) {
                line = line.to_uppercase();
            }
            for _ in 0..t.value().unwrap_or(1) {
                println!("{line}");
            }
        })
}

fn check_command() -> Command {
    let path = Param::<PathBuf>::positional("path", 0)
        .help("File or directory to look for")
        .build();

    let p = path.clone();
    Command::new("check")
        .description("Exit 0 if the path exists, 1 otherwise")
        .param(&path)
        .handler_sync(move || p.value().is_some_and(|path| path.exists()))
}

fn wait_command() -> Command {
    let seconds = Param::<u64>::named("--seconds")
        .alias("-s")
        .default_value(1)
        .help("How long to wait")
        .build();

    let s = seconds.clone();
    Command::new("wait")
        .description("Sleep, stopping early on Ctrl-C")
        .param(&seconds)
        .handler(Handler::with_args_async(
            move |args: BoundArgs, cancel: CancellationToken| {
                let duration = Duration::from_secs(args.get(&s).unwrap_or(1));
                async move {
                    tokio::select! {
                        () = tokio::time::sleep(duration) => 0,
                        () = cancel.cancelled() => EXIT_CANCELLED,
                    }
                }
            },
        ))
}

fn remote_group() -> VerbGroup {
    let store = Param::<PathBuf>::named("--store")
        .default_value(PathBuf::from("remotes.yml"))
        .help("Remote list file")
        .build();
    let shared = Arc::new(ParameterSet::new().with(&store));

    VerbGroup::new("remote")
        .description("Manage the remote list")
        .child(remote_add(&store, &shared))
        .child(remote_remove(&store, &shared))
        .child(remote_list(&store, &shared))
}

fn remote_add(store: &Param<PathBuf>, shared: &Arc<ParameterSet>) -> Command {
    let name = Param::<String>::positional("name", 0).help("Remote name").build();
    let url = Param::<String>::positional("url", 1).help("Remote URL").build();
    let fetch = Param::<bool>::named("--fetch")
        .alias("-f")
        .help("Fetch after adding")
        .build();

    let (store, n, u, f) = (store.clone(), name.clone(), url.clone(), fetch.clone());
    Command::new("add")
        .description("Add a remote")
        .param(&name)
        .param(&url)
        .param(&fetch)
        .inherit(Arc::clone(shared))
        .handler_args(move |args: &BoundArgs| -> Result<(), HandlerError> {
            let path = args.get(&store).unwrap_or_default();
            let name = args.get(&n).unwrap_or_default();
            let remote = Remote {
                url: args.get(&u).unwrap_or_default(),
                fetch: args.get(&f).unwrap_or(false),
            };

            let mut remotes = RemoteStore::load(&path)?;
            if !remotes.add(&name, remote) {
                return Err(HandlerError::message(format!("remote `{name}` already exists")));
            }
            remotes.save(&path)?;
            debug!(remote = %name, store = %path.display(), "Remote added");
            Ok(())
        })
}

fn remote_remove(store: &Param<PathBuf>, shared: &Arc<ParameterSet>) -> Command {
    let name = Param::<String>::positional("name", 0).help("Remote name").build();

    let (store, n) = (store.clone(), name.clone());
    Command::new("remove")
        .alias("rm")
        .description("Remove a remote")
        .param(&name)
        .inherit(Arc::clone(shared))
        .handler_sync(move || -> Result<(), HandlerError> {
            let path = store.value().unwrap_or_default();
            let name = n.value().unwrap_or_default();

            let mut remotes = RemoteStore::load(&path)?;
            if remotes.remove(&name).is_none() {
                return Err(HandlerError::message(format!("no such remote `{name}`")));
            }
            remotes.save(&path)?;
            Ok(())
        })
}

fn remote_list(store: &Param<PathBuf>, shared: &Arc<ParameterSet>) -> Command {
    let format = Param::<String>::named("--format")
        .choices(&["table", "json", "yaml"])
        .default_value("table".to_string())
        .help("Output format")
        .build();

    let (store, fmt) = (store.clone(), format.clone());
    Command::new("list")
        .alias("ls")
        .description("List remotes")
        .param(&format)
        .inherit(Arc::clone(shared))
        .handler_sync(move || -> Result<(), HandlerError> {
            let remotes = RemoteStore::load(&store.value().unwrap_or_default())?;
            match fmt.value().as_deref() {
                Some("json") => println!("{}", serde_json::to_string_pretty(&remotes)?),
                Some("yaml") => print!("{}", serde_yaml::to_string(&remotes)?),
                _ => print!("{}", remotes.to_table()),
            }
            Ok(())
        })
}

fn schema_command() -> Command {
    let format = Param::<String>::named("--format")
        .choices(&["json", "yaml"])
        .default_value("json".to_string())
        .help("Output format")
        .build();

    let fmt = format.clone();
    Command::new("schema")
        .description("Print the declared command tree")
        .param(&format)
        .handler_sync(move || -> Result<(), HandlerError> {
            let tree = CommandTree::new(build_root())?;
            let schema = TreeSchema::from_tree(&tree);
            match fmt.value().as_deref() {
                Some("yaml") => print!("{}", serde_yaml::to_string(&schema)?),
                _ => println!("{}", schema.to_json()?),
            }
            Ok(())
        })
}
