use assert_cmd::Command;

struct Output {
    stdout: String,
    stderr: String,
    code: Option<i32>,
}

fn run_command(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::cargo_bin("resolve").unwrap();
    cmd.env_remove("RESOLVE_FAMILY").env_remove("RUST_LOG");
    for (key, value) in envs {
        cmd.env(key, value);
    }

    let output = cmd.args(args).output().expect("Failed to execute process");

    Output {
        stdout: String::from_utf8(output.stdout).expect("stdout is not valid utf8"),
        stderr: String::from_utf8(output.stderr).expect("stderr is not valid utf8"),
        code: output.status.code(),
    }
}

fn result_lines(stdout: &str) -> Vec<&str> {
    let mut lines = stdout.lines();
    let banner = lines.next().expect("banner missing");
    assert!(banner.starts_with("Resolving `"), "banner: {banner:?}");
    assert!(banner.ends_with("':"), "banner: {banner:?}");

    lines.collect()
}

#[test]
fn wrong_argument_count() {
    for args in [vec![], vec!["a.example", "b.example"]] {
        let output = run_command(&args, &[]);

        assert_eq!(output.code, Some(1), "args: {args:?}");
        assert!(output.stdout.is_empty(), "args: {args:?}");
        assert!(
            output.stderr.starts_with("Usage: ") && output.stderr.contains("<hostname>"),
            "args: {args:?}, stderr: {:?}",
            output.stderr
        );
    }
}

#[test]
fn unknown_family_is_usage_error() {
    let output = run_command(&["--family", "ipx", "localhost"], &[]);

    assert_eq!(output.code, Some(1));
    assert!(output.stderr.starts_with("Usage: "));
}

#[test]
fn help_exits_zero() {
    let output = run_command(&["--help"], &[]);

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("--family"));
}

#[test]
fn banner_names_target_and_local_host() {
    let output = run_command(&["127.0.0.1"], &[]);

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    let banner = output.stdout.lines().next().unwrap();
    assert!(banner.starts_with("Resolving `127.0.0.1' from `"));
}

#[test]
fn any_family_tags_entries() {
    let output = run_command(&["127.0.0.1"], &[]);

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(result_lines(&output.stdout), vec!["IPv4 127.0.0.1"]);
}

#[test]
fn any_family_localhost() {
    let output = run_command(&["localhost"], &[]);

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    let lines = result_lines(&output.stdout);
    assert!(!lines.is_empty());
    for line in lines {
        let (tag, addr) = line.split_once(' ').unwrap();
        match tag {
            "IPv4" => assert!(addr.parse::<std::net::Ipv4Addr>().is_ok(), "{line}"),
            "IPv6" => assert!(addr.parse::<std::net::Ipv6Addr>().is_ok(), "{line}"),
            _ => panic!("unexpected line {line:?}"),
        }
    }
}

#[test]
fn ipv4_localhost() {
    let output = run_command(&["-4", "localhost"], &[]);

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(
        result_lines(&output.stdout),
        vec!["localhost has address 127.0.0.1"]
    );
}

#[test]
fn ipv6_loopback() {
    let output = run_command(&["--family", "ipv6", "::1"], &[]);

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(result_lines(&output.stdout), vec!["::1 has IPv6 address ::1"]);
}

#[test]
fn family_from_environment() {
    let output = run_command(&["127.0.0.1"], &[("RESOLVE_FAMILY", "ipv4")]);

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(
        result_lines(&output.stdout),
        vec!["127.0.0.1 has address 127.0.0.1"]
    );
}

#[test]
fn unresolvable_host() {
    for family in ["any", "ipv4"] {
        let output = run_command(&["--family", family, "no-such-host.invalid"], &[]);

        assert_eq!(output.code, Some(1), "family: {family}");
        assert!(result_lines(&output.stdout).is_empty(), "family: {family}");
        assert!(
            output.stderr.starts_with("getaddrinfo: "),
            "family: {family}, stderr: {:?}",
            output.stderr
        );
    }
}

#[test]
fn logs_stay_off_stdout() {
    let output = run_command(&["-vv", "127.0.0.1"], &[]);

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(result_lines(&output.stdout), vec!["IPv4 127.0.0.1"]);
    assert!(output.stderr.contains("DEBUG"), "stderr: {:?}", output.stderr);
}
