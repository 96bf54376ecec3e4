//! Seed command implementation.

use super::error::{DynamodbError, Result};
use aws_sdk_dynamodb::types::{PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use moviestore_core::movie::{InfoValue, Movie};
use moviestore_core::storage::encode;
use moviestore_core::storage::sdk::{item_to_sdk, SdkItem};
use std::collections::BTreeMap;

/// Maximum number of requests in one BatchWriteItem call.
const BATCH_SIZE: usize = 25;

/// Demo movies with a mix of flat and nested info.
pub fn demo_movies() -> Vec<Movie> {
    let cast = |names: &[&str]| -> InfoValue {
        names
            .iter()
            .map(|name| InfoValue::from(*name))
            .collect::<Vec<_>>()
            .into()
    };

    let mut inception_ratings = BTreeMap::new();
    inception_ratings.insert("imdb".to_string(), InfoValue::from(8.8));
    inception_ratings.insert("metacritic".to_string(), InfoValue::from(74));

    vec![
        Movie::new("Inception", 2010)
            .with_info("genre", "scifi")
            .with_info("director", "Christopher Nolan")
            .with_info("actors", cast(&["Leonardo DiCaprio", "Elliot Page"]))
            .with_info("ratings", inception_ratings)
            .with_info("plot", "A thief steals secrets through dream-sharing."),
        Movie::new("Heat", 1995)
            .with_info("genre", "crime")
            .with_info("director", "Michael Mann")
            .with_info("actors", cast(&["Al Pacino", "Robert De Niro"]))
            .with_info("rating", 8.3),
        Movie::new("Spirited Away", 2001)
            .with_info("genre", "animation")
            .with_info("director", "Hayao Miyazaki")
            .with_info("rating", 8.6)
            .with_info("oscar", true),
        Movie::new("The Matrix", 1999)
            .with_info("genre", "scifi")
            .with_info("actors", cast(&["Keanu Reeves", "Carrie-Anne Moss"]))
            .with_info("rating", 8.7)
            .with_info("sequels", 3),
        Movie::new("The Matrix", 2021)
            .with_info("genre", "scifi")
            .with_info("subtitle", "Resurrections")
            .with_info("rating", 5.7),
        Movie::new("Arrival", 2016),
    ]
}

/// Convert a movie into a DynamoDB item.
pub fn movie_to_item(movie: &Movie) -> SdkItem {
    item_to_sdk(&encode(movie))
}

/// Insert movies into DynamoDB.
///
/// Returns the number of movies written. Items the store leaves unprocessed
/// are not retried and are not counted.
pub async fn seed_movies(client: &Client, table_name: &str, movies: &[Movie]) -> Result<usize> {
    let mut inserted = 0;

    for chunk in movies.chunks(BATCH_SIZE) {
        let write_requests = chunk
            .iter()
            .map(|movie| {
                let put = PutRequest::builder()
                    .set_item(Some(movie_to_item(movie)))
                    .build()
                    .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?;
                Ok(WriteRequest::builder().put_request(put).build())
            })
            .collect::<Result<Vec<_>>>()?;

        let output = client
            .batch_write_item()
            .request_items(table_name, write_requests)
            .send()
            .await
            .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?;

        let unprocessed = output
            .unprocessed_items()
            .and_then(|items| items.get(table_name))
            .map(Vec::len)
            .unwrap_or(0);

        inserted += chunk.len() - unprocessed;
    }

    Ok(inserted)
}

/// Format a movie for display.
pub fn format_movie(movie: &Movie) -> String {
    match movie.info.get("genre").and_then(InfoValue::as_str) {
        Some(genre) => format!("{} ({}) - {}", movie.title, movie.year, genre),
        None => format!("{} ({})", movie.title, movie.year),
    }
}
