// build.rs

use clap::builder::FalseyValueParser;
use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Boolean flag that can also be set from the environment
fn flag(name: &'static str, env_var: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .env(env_var)
        .action(ArgAction::SetTrue)
        .value_parser(FalseyValueParser::new())
        .help(help)
}

fn build_cli() -> Command {
    Command::new("mvncopy")
        .version(env!("CARGO_PKG_VERSION"))
        .author("mvncopy Contributors")
        .about("Resolve Maven artifacts and copy them into a directory")
        .arg(
            Arg::new("packages")
                .short('p')
                .long("packages")
                .value_name("COORDS")
                .env("PACKAGES_TO_COPY")
                .action(ArgAction::Append)
                .help("Package coordinates (group:artifact[:version][@classifier]), separated by ';', ',' or spaces"),
        )
        .arg(
            Arg::new("target_dir")
                .short('t')
                .long("target-dir")
                .value_name("DIR")
                .env("TARGET_DIR")
                .help("Directory the artifacts are copied into"),
        )
        .arg(
            Arg::new("repo")
                .long("repo")
                .value_name("URL")
                .env("MAVEN_REPOS")
                .value_delimiter(';')
                .action(ArgAction::Append)
                .help("Additional repository URL or path, searched before the defaults"),
        )
        .arg(
            Arg::new("android_sdk")
                .long("android-sdk")
                .value_name("DIR")
                .env("ANDROID_HOME")
                .help("Android SDK root; its bundled m2repositories are searched"),
        )
        .arg(flag(
            "maven-local",
            "USE_MAVEN_LOCAL_REPO",
            "Search the Maven local repository (~/.m2/repository)",
        ))
        .arg(flag(
            "no-remote-repos",
            "NO_REMOTE_MAVEN_REPOS",
            "Do not search Google Maven and Maven Central",
        ))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the report as JSON"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Hide the progress bar"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log resolution details to stderr"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("mvncopy.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
