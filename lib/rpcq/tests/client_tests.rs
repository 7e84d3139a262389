//! `OpenApiClient` tests with derived procedures against a wiremock server.

use rpcq::prelude::*;
use rpcq::{CollectionFormat, QueryState};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, body_json, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Pet {
    id: u64,
    name: String,
}

#[derive(Debug, Serialize)]
struct PetPath {
    id: u64,
}

#[derive(Debug, Serialize)]
struct GetPetInput {
    path: PetPath,
}

#[derive(Debug, Default, Serialize)]
struct ListPetsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

#[derive(Debug, Default, Serialize)]
struct ListPetsInput {
    query: ListPetsQuery,
}

#[derive(Debug, Serialize)]
struct NewPet {
    name: String,
}

#[derive(Debug, Serialize)]
struct CreatePetInput {
    body: NewPet,
}

#[derive(Procedure)]
#[procedure(key = "GET /pets/{id}", input = GetPetInput, output = Pet)]
struct GetPet;

#[derive(Procedure)]
#[procedure(key = "GET /pets", input = ListPetsInput, output = Vec<Pet>)]
struct ListPets;

#[derive(Procedure)]
#[procedure(key = "POST /pets", input = CreatePetInput, output = Pet)]
struct CreatePet;

#[derive(Procedure)]
#[procedure(key = "DELETE /pets/{id}", input = GetPetInput, output = ())]
struct DeletePet;

#[derive(Procedure)]
#[procedure(key = "GET /health")]
struct Health;

fn get_pet(id: u64) -> GetPetInput {
    GetPetInput {
        path: PetPath { id },
    }
}

fn client(server: &MockServer) -> OpenApiClient<HyperClient> {
    OpenApiClient::new(HyperClient::new(), ClientOptions::new(server.uri()))
}

#[test]
fn derived_constants() {
    assert_eq!(GetPet::KEY, "GET /pets/{id}");
    assert_eq!(GetPet::METHOD, Method::Get);
    assert_eq!(GetPet::PATH, "/pets/{id}");
    assert_eq!(GetPet::PATH_PARAMS, ["id"]);
    assert_eq!(CreatePet::kind(), rpcq::ProcedureKind::Mutation);
    assert_eq!(Health::key().to_string(), "GET /health");
}

#[tokio::test]
async fn test_typed_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pets/5"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "Rex"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let pet = client.query::<GetPet>(get_pet(5).into()).await.expect("query");
    let cached = client.query::<GetPet>(get_pet(5).into()).await.expect("query");

    let rex = Pet {
        id: 5,
        name: "Rex".to_string(),
    };
    assert_eq!(pet, Some(rex.clone()));
    assert_eq!(cached, Some(rex));
}

#[tokio::test]
async fn test_query_parameters_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pets"))
        .and(query_param("tag", "dog"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let input = ListPetsInput {
        query: ListPetsQuery {
            tag: Some("dog".to_string()),
            limit: Some(2),
        },
    };
    let pets = client.query::<ListPets>(input.into()).await.expect("query");
    assert_eq!(pets, Some(vec![]));

    let requests = mock_server.received_requests().await.expect("recording");
    assert_eq!(requests[0].url.query(), Some("tag=dog&limit=2"));
}

#[tokio::test]
async fn test_empty_query_has_no_question_mark() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    client
        .query::<ListPets>(ListPetsInput::default().into())
        .await
        .expect("query");

    let requests = mock_server.received_requests().await.expect("recording");
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_disabled_query_never_hits_server_or_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let result = client
        .query::<GetPet>(QueryInput::Disabled)
        .await
        .expect("disabled");

    assert_eq!(result, None);
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_typed_mutation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pets"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"name": "Tom"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9, "name": "Tom"})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let input = CreatePetInput {
        body: NewPet {
            name: "Tom".to_string(),
        },
    };

    let first = client.mutate::<CreatePet>(&input).await.expect("mutation");
    client.mutate::<CreatePet>(&input).await.expect("mutation");

    assert_eq!(first.id, 9);
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_mutation_with_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/pets/3"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    client
        .mutate::<DeletePet>(&get_pet(3))
        .await
        .expect("deleted");
}

#[tokio::test]
async fn test_no_input_procedure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "up"})))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let health = client.query::<Health>(().into()).await.expect("health");

    assert_eq!(health, Some(json!({"status": "up"})));
    let key = CacheKey::new(&Health::key());
    assert!(client.cache().state(&key).is_some());
}

#[tokio::test]
async fn test_error_state_set_then_cleared() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pets/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "no such pet"})))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pets/404"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 404, "name": "Ghost"})))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let err = client
        .query::<GetPet>(get_pet(404).into())
        .await
        .expect_err("not found");

    assert!(err.is_not_found());
    assert_eq!(
        err.payload(),
        Some(&Payload::Json(json!({"message": "no such pet"})))
    );

    let key = CacheKey::with_input(&GetPet::key(), Some(json!({"path": {"id": 404}})));
    let state: QueryState = client.cache().state(&key).expect("state");
    assert!(state.is_error());
    assert_eq!(state.error_status, Some(404));

    let pet = client
        .query::<GetPet>(get_pet(404).into())
        .await
        .expect("retry");
    assert_eq!(pet.map(|p| p.name), Some("Ghost".to_string()));

    let state = client.cache().state(&key).expect("state");
    assert!(!state.is_error());
    assert_eq!(state.fetch_count, 2);
}

#[tokio::test]
async fn test_invalidate_after_mutation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/pets"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1, "name": "Tom"})))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    client
        .query::<ListPets>(ListPetsInput::default().into())
        .await
        .expect("list");

    let input = CreatePetInput {
        body: NewPet {
            name: "Tom".to_string(),
        },
    };
    client.mutate::<CreatePet>(&input).await.expect("create");
    client.invalidate_procedure::<ListPets>(None);

    client
        .query::<ListPets>(ListPetsInput::default().into())
        .await
        .expect("list again");
}

#[tokio::test]
async fn test_set_data_short_circuits_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    client
        .set_data::<GetPet, _>(&get_pet(1), |previous| {
            assert!(previous.is_none());
            Pet {
                id: 1,
                name: "Seeded".to_string(),
            }
        })
        .expect("set");

    let pet = client.query::<GetPet>(get_pet(1).into()).await.expect("query");
    assert_eq!(pet.map(|p| p.name), Some("Seeded".to_string()));
}

#[tokio::test]
async fn test_header_provider_and_collection_format() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("Authorization", "Bearer token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("found"))
        .mount(&mock_server)
        .await;

    let options = ClientOptions::builder(mock_server.uri())
        .headers(|| {
            Some(rpcq::Headers::from([(
                "Authorization".to_string(),
                "Bearer token".to_string(),
            )]))
        })
        .collection_format(CollectionFormat::Multi)
        .build();
    let client = OpenApiClient::new(HyperClient::new(), options);

    let payload = client
        .query_raw("GET /search", Some(json!({"query": {"tag": ["a", "b"]}})).into())
        .await
        .expect("query");
    assert_eq!(payload, Some(Payload::Text("found".to_string())));

    let requests = mock_server.received_requests().await.expect("recording");
    assert_eq!(requests[0].url.query(), Some("tag=a&tag=b"));
}
