const DEFAULT_API_BASE: &str = "http://localhost:3000";

fn print_usage_and_exit() -> ! {
    eprintln!("Usage: setup-admin <firebase-id-token> <setup-token> [api-base]");
    std::process::exit(1);
}

fn main() {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1); // 跳过程序名

    let id_token = args.next().unwrap_or_else(|| {
        eprintln!("Missing <firebase-id-token>");
        print_usage_and_exit();
    });

    let setup_token = args
        .next()
        .or_else(|| std::env::var("ADMIN_SETUP_TOKEN").ok())
        .unwrap_or_else(|| {
            eprintln!("Missing <setup-token>");
            print_usage_and_exit();
        });

    let api_base = args
        .next()
        .or_else(|| std::env::var("INKWELL_API").ok())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    if args.next().is_some() {
        eprintln!("Too many arguments provided.");
        print_usage_and_exit();
    }

    let url = format!("{}/api/admin/setup", api_base.trim_end_matches('/'));

    let client = reqwest::blocking::Client::new();
    let res = client
        .post(&url)
        .bearer_auth(id_token.trim())
        .json(&serde_json::json!({ "setup_token": setup_token }))
        .send();

    match res {
        Ok(resp) => {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            if !status.is_success() {
                eprintln!("❌ Admin setup rejected");
                eprintln!("{} | {}", status, text.trim());
                std::process::exit(1);
            } else {
                println!("✅ Admin ready");
                println!("{}", text.trim());
            }
        }
        Err(e) => {
            eprintln!("❌ Failed to contact admin API {}: {}", url, e);
            std::process::exit(1);
        }
    }
}
