use clap::Parser;

use lambda_eq::expr::{ElementInit, Expr, MemberBinding, New};
use lambda_eq::param::Parameter;
use lambda_eq::types::{CtorRef, MemberRef, MethodRef, TypeTag};
use lambda_eq::value::{Record, Value};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Only run scenarios whose name contains this text.
    #[arg(value_name = "FILTER")]
    filter: Option<String>,

    /// Print both trees of each pair in DOT format.
    #[clap(long)]
    dot: bool,

    /// Log every folded constant and mismatch.
    #[clap(long)]
    debug: bool,
}

struct Scenario {
    name: &'static str,
    left: Option<Expr>,
    right: Option<Expr>,
}

fn well_formed(name: &str) -> Expr {
    let uri = TypeTag::named("Uri");
    let uri_kind = TypeTag::named("UriKind");
    let to_string = MethodRef::instance(&uri, "ToString", [], &TypeTag::string());
    let check = MethodRef::static_method(
        &uri,
        "IsWellFormedUriString",
        [TypeTag::string(), uri_kind.clone()],
        &TypeTag::bool(),
    );
    let p = Parameter::new(name, &uri);
    let body = Expr::call_static(
        &check,
        vec![
            Expr::call(Expr::param(&p), &to_string, vec![]),
            Expr::constant(1, &uri_kind),
        ],
    );
    Expr::lambda(vec![p], body)
}

fn builder(name: &str, port: Expr, port_first: bool) -> Expr {
    let uri = TypeTag::named("Uri");
    let builder = TypeTag::named("UriBuilder");
    let host = MemberRef::property(&uri, "Host", &TypeTag::string());
    let is_empty = MethodRef::static_method(
        &TypeTag::string(),
        "IsNullOrEmpty",
        [TypeTag::string()],
        &TypeTag::bool(),
    );
    let b_port = MemberRef::property(&builder, "Port", &TypeTag::int());
    let b_host = MemberRef::property(&builder, "Host", &TypeTag::string());

    let p = Parameter::new(name, &uri);
    let host_choice = Expr::condition(
        Expr::call_static(&is_empty, vec![Expr::member(Expr::param(&p), &host)]),
        Expr::string("abc"),
        Expr::string("def"),
    );
    let mut bindings = vec![
        MemberBinding::assign(&b_port, port),
        MemberBinding::assign(&b_host, host_choice),
    ];
    if !port_first {
        bindings.reverse();
    }
    let new = New::new(&CtorRef::new(&builder, [uri.clone()]), vec![Expr::param(&p)]);
    Expr::lambda(vec![p], Expr::member_init(new, bindings))
}

fn captured(closure: &str, field: &str, value: Value, ty: &TypeTag) -> Expr {
    let closure_ty = TypeTag::named(closure);
    let record = Record::new(&closure_ty).with_field(field, value);
    Expr::member(
        Expr::constant(Value::record(record), &closure_ty),
        &MemberRef::field(&closure_ty, field, ty),
    )
}

fn dictionary(entries: &[(i32, i32)]) -> Expr {
    let dict = TypeTag::named("Dictionary<Int32, Int32>");
    let add = MethodRef::instance(&dict, "Add", [TypeTag::int(), TypeTag::int()], &TypeTag::void());
    let g = Parameter::new("g", &TypeTag::object());
    let inits = entries
        .iter()
        .map(|&(k, v)| ElementInit::new(&add, vec![Expr::int(k), Expr::int(v)]))
        .collect();
    Expr::lambda(vec![g], Expr::list_init(New::new(&CtorRef::new(&dict, []), vec![]), inits))
}

fn anonymous(type_name: &str, port_first: bool) -> Expr {
    let uri = TypeTag::named("Uri");
    let anon = TypeTag::anonymous(type_name);
    let x = Parameter::new("x", &uri);
    let port = (
        TypeTag::int(),
        Expr::int(443),
        MemberRef::property(&anon, "Port", &TypeTag::int()),
    );
    let host = (
        TypeTag::string(),
        Expr::member(Expr::param(&x), &MemberRef::property(&uri, "Host", &TypeTag::string())),
        MemberRef::property(&anon, "Host", &TypeTag::string()),
    );
    let fields = if port_first { [port, host] } else { [host, port] };
    let (mut tys, mut args, mut members) = (vec![], vec![], vec![]);
    for (ty, arg, member) in fields {
        tys.push(ty);
        args.push(arg);
        members.push(member);
    }
    let body = Expr::new_anonymous(&CtorRef::new(&anon, tys), args, members);
    Expr::lambda_returning(vec![x], body, &TypeTag::object())
}

fn scenarios() -> Vec<Scenario> {
    let secure = captured("<>c__DisplayClass2_0", "isSecure", Value::from(true), &TypeTag::bool());
    let discard = Parameter::new("_", &TypeTag::object());
    vec![
        Scenario {
            name: "renamed-parameter",
            left: Some(well_formed("arg1")),
            right: Some(well_formed("arg2")),
        },
        Scenario {
            name: "captured-port",
            left: Some(builder(
                "x",
                captured("<>c__DisplayClass1_0", "port", Value::from(443), &TypeTag::int()),
                true,
            )),
            right: Some(builder(
                "u",
                Expr::condition(secure, Expr::int(443), Expr::int(80)),
                false,
            )),
        },
        Scenario {
            name: "dictionary-order",
            left: Some(dictionary(&[(3, 33), (7, 77)])),
            right: Some(dictionary(&[(7, 77), (3, 33)])),
        },
        Scenario {
            name: "dictionary-value",
            left: Some(dictionary(&[(3, 33), (7, 77)])),
            right: Some(dictionary(&[(7, 78), (3, 33)])),
        },
        Scenario {
            name: "absent",
            left: Some(Expr::lambda(vec![discard], Expr::string(""))),
            right: None,
        },
        Scenario {
            name: "anonymous",
            left: Some(anonymous("<>f__AnonymousType0`2", true)),
            right: Some(anonymous("<>f__AnonymousType1`2", false)),
        },
    ]
}

fn show(side: &str, expr: Option<&Expr>, dot: bool) -> color_eyre::Result<()> {
    match expr {
        Some(e) => {
            println!("  {} = {}", side, e);
            if dot {
                print!("{}", e.to_dot()?);
            }
        }
        None => println!("  {} = null", side),
    }
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.debug {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);

    for scenario in scenarios() {
        if let Some(filter) = &args.filter {
            if !scenario.name.contains(filter.as_str()) {
                continue;
            }
        }
        println!("{}:", scenario.name);
        show("left", scenario.left.as_ref(), args.dot)?;
        show("right", scenario.right.as_ref(), args.dot)?;
        match lambda_eq::equivalent(scenario.left.as_ref(), scenario.right.as_ref()) {
            Ok(verdict) => println!("  equivalent = {}", verdict),
            Err(e) => println!("  error = {}", e),
        }
    }

    Ok(())
}
