#[actix_web::main]
async fn main() -> std::io::Result<()> {
    warrant_extract_lib::run().await
}
