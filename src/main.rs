#[actix_web::main]
async fn main() -> std::io::Result<()> {
    quotation_server::run().await
}
