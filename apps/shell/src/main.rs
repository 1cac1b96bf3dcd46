use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use client_core::{
    resolve, ChatSender, ChatSession, NavigationStore, PageDescriptor, PortfolioClient,
    SendOutcome,
};

/// Text-mode shell around the portfolio navigation core. Renders whatever
/// page the resolver picks for the current route and accepts nav and chat
/// commands on stdin.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    server_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let client = PortfolioClient::new(args.server_url.clone());
    let mut chat = ChatSession::new(args.server_url);
    let mut store = NavigationStore::new();

    println!("portfolio shell - type 'help' for commands");
    render(&store, &client, &chat).await;

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        match input.split_once(' ').unwrap_or((input, "")) {
            ("quit", _) | ("exit", _) => break,
            ("help", _) => print_help(),
            ("go", target) if !target.is_empty() => store.navigate(target),
            ("open", slug) if !slug.is_empty() => {
                store.navigate(format!("blog:{slug}").as_str())
            }
            ("back", _) => store.back(),
            ("chat", message) if !message.is_empty() => {
                match chat.send(message).await {
                    SendOutcome::Busy => {
                        println!("(still waiting on the previous reply)");
                    }
                    SendOutcome::Replied {
                        navigate_to: Some(view),
                    } => store.navigate(view),
                    SendOutcome::Replied { navigate_to: None } | SendOutcome::Ignored => {}
                }
            }
            _ => {
                println!("unrecognized command, try 'help'");
                continue;
            }
        }
        render(&store, &client, &chat).await;
    }

    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  go <view>     navigate (home, projects, blog, chat, or blog:<slug>)");
    println!("  open <slug>   open a blog article");
    println!("  back          return from an article to the blog index");
    println!("  chat <text>   ask the portfolio assistant");
    println!("  quit          leave");
}

async fn render(store: &NavigationStore, client: &PortfolioClient, chat: &ChatSession) {
    let route = store.current();
    println!("-- [{}] --", route.view);
    match resolve(&route) {
        PageDescriptor::Home => {
            println!("Welcome. Projects, articles and a chat assistant live here.");
        }
        PageDescriptor::Projects => match client.fetch_projects().await {
            Ok(projects) => {
                for project in projects {
                    println!("* {} - {}", project.name, project.short_summary);
                }
            }
            Err(error) => println!("could not load projects: {error}"),
        },
        PageDescriptor::Blog => match client.fetch_blogs().await {
            Ok(blogs) => {
                for blog in blogs {
                    println!("* [{}] {} - {}", blog.slug, blog.title, blog.excerpt);
                }
            }
            Err(error) => println!("could not load articles: {error}"),
        },
        PageDescriptor::BlogDetail { slug: None } => {
            println!("This article link is missing its slug. Use 'back' and pick a post.");
        }
        PageDescriptor::BlogDetail { slug: Some(slug) } => match client.fetch_blog(&slug).await {
            Ok(post) => {
                println!("# {}", post.title);
                println!("{}", post.content);
            }
            Err(error) => println!("could not load '{slug}': {error}"),
        },
        PageDescriptor::Chat => {
            for message in chat.transcript() {
                let who = match message.sender {
                    ChatSender::User => "you",
                    ChatSender::Bot => "bot",
                };
                println!("{who}: {}", message.text);
            }
        }
    }
}
