use clap::Parser;
use threadmail::cli::{Cli, Command, RenderMode, SessionCommand};

#[test]
fn parses_session_set() {
    let cli = Cli::try_parse_from([
        "threadmail", "session", "set", "--id", "7", "--email", "alice@x.com", "--name", "Alice",
    ])
    .expect("cli parse should work");
    match cli.command {
        Command::Session(session) => match session.command {
            SessionCommand::Set(args) => {
                assert_eq!(args.id, "7");
                assert_eq!(args.email, "alice@x.com");
                assert_eq!(args.name.as_deref(), Some("Alice"));
            }
            other => panic!("expected session set, got {other:?}"),
        },
        _ => panic!("expected session command"),
    }
}

#[test]
fn parses_thread_with_global_flags() {
    let cli = Cli::try_parse_from(["threadmail", "thread", "t-42", "--json", "-vv", "--quoted"])
        .expect("cli parse should work");
    assert!(cli.json);
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Command::Thread(thread) => {
            assert_eq!(thread.thread_id, "t-42");
            assert!(thread.quoted);
            assert!(!thread.expand_all);
        }
        _ => panic!("expected thread command"),
    }
}

#[test]
fn parses_reply_all_with_extra_cc() {
    let cli = Cli::try_parse_from([
        "threadmail",
        "reply",
        "t-1",
        "<m2@x.com>",
        "--all",
        "--cc",
        "a@x.com,b@x.com",
        "--body",
        "thanks",
    ])
    .expect("cli parse should work");
    match cli.command {
        Command::Reply(reply) => {
            assert!(reply.all);
            assert_eq!(reply.message_id, "<m2@x.com>");
            assert_eq!(reply.cc, ["a@x.com", "b@x.com"]);
            assert_eq!(reply.body.body.as_deref(), Some("thanks"));
            assert!(!reply.draft);
        }
        _ => panic!("expected reply command"),
    }
}

#[test]
fn parses_forward_draft() {
    let cli = Cli::try_parse_from([
        "threadmail", "forward", "t-1", "m-1", "--to", "carol@x.com", "--draft",
    ])
    .expect("cli parse should work");
    match cli.command {
        Command::Forward(forward) => {
            assert_eq!(forward.to, ["carol@x.com"]);
            assert!(forward.draft);
            assert!(forward.body.body.is_none());
        }
        _ => panic!("expected forward command"),
    }
}

#[test]
fn send_requires_subject() {
    assert!(Cli::try_parse_from(["threadmail", "send", "--to", "a@x.com", "--body", "hi"]).is_err());
}

#[test]
fn parses_render_mode() {
    let cli = Cli::try_parse_from(["threadmail", "render", "--mode", "collapse", "--stdin"])
        .expect("cli parse should work");
    match cli.command {
        Command::Render(render) => {
            assert_eq!(render.mode, RenderMode::Collapse);
            assert!(render.body.stdin);
        }
        _ => panic!("expected render command"),
    }
}
