//! Petstore Example
//!
//! Demonstrates typed procedures, the route catalog and the query cache.
//!
//! ```sh
//! PETSTORE_URL=http://localhost:8080 cargo run -p petstore-demo
//! ```

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use rpcq::prelude::*;
use rpcq::{Headers, RouteCatalog};

const CATALOG: &str = include_str!("petstore.json");

// ============================================================================
// Data Types
// ============================================================================

/// A pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: u64,
    pub name: String,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetPath {
    pub pet_id: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PetInput {
    pub path: PetPath,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListPetsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListPetsInput {
    pub query: ListPetsQuery,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPet {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePetInput {
    pub body: NewPet,
}

// ============================================================================
// Procedures
// ============================================================================

#[derive(Procedure)]
#[procedure(key = "GET /pets", input = ListPetsInput, output = Vec<Pet>)]
pub struct ListPets;

#[derive(Procedure)]
#[procedure(key = "POST /pets", input = CreatePetInput, output = Pet)]
pub struct CreatePet;

#[derive(Procedure)]
#[procedure(key = "GET /pets/{petId}", input = PetInput, output = Pet)]
pub struct GetPet;

#[derive(Procedure)]
#[procedure(key = "DELETE /pets/{petId}", input = PetInput, output = ())]
pub struct DeletePet;

#[derive(Procedure)]
#[procedure(key = "GET /health", output = String)]
pub struct Health;

/// Keys of every derived procedure.
pub const PROCEDURE_KEYS: [&str; 5] = [
    ListPets::KEY,
    CreatePet::KEY,
    GetPet::KEY,
    DeletePet::KEY,
    Health::KEY,
];

/// Load the bundled catalog and check the derived procedures against it.
pub fn load_catalog() -> rpcq::Result<RouteCatalog> {
    let catalog = RouteCatalog::from_openapi_document(CATALOG)?;
    catalog.validate()?;

    for key in PROCEDURE_KEYS {
        let key: ProcedureKey = key.parse()?;
        if catalog.route(&key).is_none() {
            return Err(Error::invalid_catalog(format!("{key} is not in the catalog")));
        }
    }

    Ok(catalog)
}

pub fn petstore_client(base_url: impl Into<String>) -> OpenApiClient<HyperClient> {
    let options = ClientOptions::builder(base_url)
        .headers(|| {
            std::env::var("PETSTORE_API_KEY")
                .ok()
                .map(|key| Headers::from([("api_key".to_string(), key)]))
        })
        .build();

    OpenApiClient::new(HyperClient::builder().with_logging().build(), options)
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> rpcq::Result<()> {
    let catalog = load_catalog()?;

    println!("=== Procedures ===");
    for route in catalog.routes() {
        let marker = if route.requires_no_input() { " (no input)" } else { "" };
        println!("{}\t{}{marker}", route.key().kind(), route.key());
    }

    let Ok(base_url) = std::env::var("PETSTORE_URL") else {
        println!("\nSet PETSTORE_URL to call a running petstore.");
        return Ok(());
    };

    let client = petstore_client(base_url);

    let health = client.query::<Health>(().into()).await?;
    println!("\nhealth: {health:?}");

    let created = client
        .mutate::<CreatePet>(&CreatePetInput {
            body: NewPet {
                name: "Rex".to_string(),
                tag: Some("dog".to_string()),
            },
        })
        .await?;
    println!("created: {created:?}");
    client.invalidate_procedure::<ListPets>(None);

    let dogs = ListPetsInput {
        query: ListPetsQuery {
            tag: Some("dog".to_string()),
            limit: Some(10),
        },
    };
    let pets = client.query::<ListPets>(dogs.into()).await?;
    println!("dogs: {pets:?}");

    let path = PetPath { pet_id: created.id };
    match client.query::<GetPet>(PetInput { path }.into()).await {
        Ok(pet) => println!("fetched: {pet:?}"),
        Err(err) if err.is_not_found() => println!("not found: {:?}", err.payload()),
        Err(err) => return Err(err),
    }

    Ok(())
}
