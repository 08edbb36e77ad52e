use std::io::Write;
use std::path::PathBuf;

use anyhow::Context as _;
use colored::Colorize;
use odb_store::{
    hash_only, IdentityResolver, LooseObjectStore, Object, ObjectResolver, ObjectStore,
    StoreConfig,
};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let ctx = Session::new(&cli)?;
    match cli.command {
        Command::Init(args) => cmd_init(&ctx, args),
        Command::HashObject(args) => cmd_hash_object(&ctx, args),
        Command::CatFile(args) => cmd_cat_file(&ctx, args),
        Command::Show(args) => cmd_show(&ctx, args),
    }
}

/// Settings shared by every command that touches the store.
struct Session {
    objects_dir: PathBuf,
    config: StoreConfig,
    format: OutputFormat,
}

impl Session {
    fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config = match &cli.config {
            Some(path) => StoreConfig::load(path)
                .with_context(|| format!("loading store config {}", path.display()))?,
            None => StoreConfig::default(),
        };
        Ok(Self {
            objects_dir: cli.git_dir.join("objects"),
            config,
            format: cli.format.clone(),
        })
    }

    /// Open the store, requiring its root to exist.
    fn store(&self) -> anyhow::Result<LooseObjectStore> {
        if !self.objects_dir.is_dir() {
            anyhow::bail!(
                "no object store at {} (run `odb init` first)",
                self.objects_dir.display()
            );
        }
        Ok(LooseObjectStore::with_config(&self.objects_dir, self.config.clone())?)
    }
}

/// With a path, creates `<path>/.git/objects`; otherwise `<git-dir>/objects`.
fn cmd_init(ctx: &Session, args: InitArgs) -> anyhow::Result<()> {
    let objects = match args.path {
        Some(path) => path.join(".git").join("objects"),
        None => ctx.objects_dir.clone(),
    };
    std::fs::create_dir_all(&objects)
        .with_context(|| format!("creating {}", objects.display()))?;
    println!("{} Initialized object store in {}", "✓".green().bold(), objects.display().to_string().bold());
    Ok(())
}

fn cmd_hash_object(ctx: &Session, args: HashObjectArgs) -> anyhow::Result<()> {
    let data = std::fs::read(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    let id = if args.write {
        let object = Object::decode(args.kind, &data)?;
        ctx.store()?.write(&object)?
    } else {
        hash_only(args.kind, &data)?
    };
    match ctx.format {
        OutputFormat::Text => println!("{id}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "id": id, "type": args.kind, "written": args.write })
        ),
    }
    Ok(())
}

fn cmd_cat_file(ctx: &Session, args: CatFileArgs) -> anyhow::Result<()> {
    let id = IdentityResolver.resolve(&args.object)?;
    let object = ctx.store()?.read(&id)?.expect_type(&id, args.kind)?;
    let mut out = std::io::stdout().lock();
    out.write_all(&object.encode())?;
    out.flush()?;
    Ok(())
}

fn cmd_show(ctx: &Session, args: ShowArgs) -> anyhow::Result<()> {
    let id = IdentityResolver.resolve(&args.object)?;
    let object = ctx.store()?.read(&id)?;
    match ctx.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "id": id,
                "type": object.object_type(),
                "size": object.encode().len(),
                "document": object.kvlm(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => print_object(&id.to_hex(), &object),
    }
    Ok(())
}

fn print_object(id: &str, object: &Object) {
    println!("{} {}", object.object_type().to_string().cyan().bold(), id.yellow());
    let Some(doc) = object.kvlm() else {
        println!("  {} bytes", object.encode().len());
        return;
    };
    for (key, value) in doc.lines() {
        let value = String::from_utf8_lossy(value);
        let mut lines = value.lines();
        println!("{} {}", String::from_utf8_lossy(key).bold(), lines.next().unwrap_or(""));
        for continuation in lines {
            println!("  {continuation}");
        }
    }
    println!();
    for line in String::from_utf8_lossy(doc.message()).lines() {
        println!("    {line}");
    }
}
