//! Items service.
//!
//! ```text
//! cargo run -p hermes --example items
//! curl 'localhost:8080/items/42?q=lamp'
//! curl 'localhost:8080/users/greet?name=ada'
//! curl -XPOST localhost:8080/items -H 'content-type: application/json' \
//!      -d '{"name": "lamp", "price": 12.5}'
//! ```
//!
//! Settings come from `hermes.toml` when present, then `HERMES_*` variables
//! (e.g. `HERMES_SERVER_HTTP_ADDR=127.0.0.1:3000`).

use std::time::Instant;

use hermes::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
struct NewItem {
    name: String,
    price: f64,
}

fn items(api: &mut Api) {
    let mut read_item = api.get("/items/{item_id}");
    let item_id = read_item.param(ParamSpec::<i64>::path("item_id").description("Item id"));
    let q = read_item.param(
        ParamSpec::<String>::query("q")
            .optional()
            .description("Free-text filter"),
    );
    read_item
        .name("read_item")
        .description("Reads one item")
        .handle(move |request| {
            let body = serde_json::json!({
                "item_id": item_id.value(&request),
                "q": q.value(&request),
            });
            async move { body }
        });

    let mut create_item = api.post("/items");
    let item = create_item.param(ParamSpec::<NewItem>::json("item").validate(|item| {
        if item.price < 0.0 {
            Err("price must not be negative".to_string())
        } else {
            Ok(())
        }
    }));
    create_item
        .name("create_item")
        .description("Creates an item from a JSON body")
        .handle(move |request| {
            let item = item.value(&request);
            async move { JsonResponse::created(item) }
        });
}

fn users(api: &Api) -> Api {
    let mut users = api.group("/users");

    let mut greet = users.get("/greet");
    let name = greet.param(ParamSpec::<String>::query("name").validate(|name| {
        if name == "admin" {
            Err("admin is not allowed".to_string())
        } else {
            Ok(())
        }
    }));
    greet
        .name("greet")
        .middleware(FnMiddleware::new("timing", |request, next| {
            Box::pin(async move {
                let started = Instant::now();
                let id = request.id();
                let response = next.run(request).await;
                tracing::debug!(request_id = %id, elapsed_us = started.elapsed().as_micros() as u64, "greet served");
                response
            })
        }))
        .on_error(|_request, err| {
            (StatusCode::BAD_REQUEST, format!("cannot greet: {err}")).into_response()
        })
        .handle(move |request| {
            let name = name.value(&request);
            async move { TextResponse::new(format!("Hello, {name}!")) }
        });

    users
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .with_dotenv()
        .with_optional_file("hermes.toml")?
        .with_env_prefix("HERMES")
        .load()?;
    init_logging(&config.log_config())?;

    let mut api = Api::new(
        ApiInfo::new("Items API")
            .summary("Example items service")
            .version("0.1.0"),
    );
    items(&mut api);
    let group = users(&api);
    api.mount(group);

    tracing::info!(addr = %config.server.http_addr, "starting items service");
    Server::from_config(api.build_with(&config), &config)
        .run()
        .await?;
    Ok(())
}
