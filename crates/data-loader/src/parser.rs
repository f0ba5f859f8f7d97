//! Parser for MovieLens data files.
//!
//! Two layouts are understood:
//! - 100k: `u.data` (`user\titem\trating\ttimestamp`) and `u.item`
//!   (`id|title|release date|video release date|url|19 genre flags`)
//! - 1M: `ratings.dat` (`user::item::rating::timestamp`) and `movies.dat`
//!   (`id::title::Genre|Genre`)
//!
//! Both are ISO-8859-1 encoded.

use crate::error::{DataLoadError, Result};
use crate::types::{Genre, Interaction, Item};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// On-disk layout of a MovieLens dataset directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetLayout {
    MovieLens100k,
    MovieLens1m,
}

impl DatasetLayout {
    pub fn ratings_file(&self) -> &'static str {
        match self {
            DatasetLayout::MovieLens100k => "u.data",
            DatasetLayout::MovieLens1m => "ratings.dat",
        }
    }

    pub fn items_file(&self) -> &'static str {
        match self {
            DatasetLayout::MovieLens100k => "u.item",
            DatasetLayout::MovieLens1m => "movies.dat",
        }
    }

    /// Detect the layout from which ratings file is present
    pub fn detect(data_dir: &Path) -> Option<Self> {
        [DatasetLayout::MovieLens100k, DatasetLayout::MovieLens1m]
            .into_iter()
            .find(|layout| data_dir.join(layout.ratings_file()).is_file())
    }

    fn ratings_separator(&self) -> &'static str {
        match self {
            DatasetLayout::MovieLens100k => "\t",
            DatasetLayout::MovieLens1m => "::",
        }
    }
}

/// Read a file with ISO-8859-1 encoding (Latin-1).
///
/// Each byte maps directly to the Unicode code point of the same value.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();
    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Pull the next field off a split line or report which one is missing
fn next_field<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    file: &str,
    line: usize,
    name: &str,
) -> Result<&'a str> {
    parts.next().ok_or_else(|| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", name),
    })
}

fn parse_field<T>(value: &str, file: &str, line: usize, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", name, e),
    })
}

/// Parse the ratings file of either layout into interactions
pub fn parse_ratings(path: &Path, layout: DatasetLayout) -> Result<Vec<Interaction>> {
    let file = layout.ratings_file();
    let separator = layout.ratings_separator();
    let lines = read_lines_latin1(path)?;
    let mut interactions = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        interactions.push(parse_rating_line(line_trimmed, separator, file, line_no)?);
    }

    Ok(interactions)
}

fn parse_rating_line(line: &str, separator: &str, file: &str, line_no: usize) -> Result<Interaction> {
    let mut parts = line.split(separator);

    let user_id = next_field(&mut parts, file, line_no, "userId")?;
    let item_id = next_field(&mut parts, file, line_no, "itemId")?;
    let rating = next_field(&mut parts, file, line_no, "rating")?;
    // The timestamp column is optional
    let timestamp = match parts.next().map(str::trim) {
        Some(ts) if !ts.is_empty() => Some(parse_field(ts, file, line_no, "timestamp")?),
        _ => None,
    };

    Ok(Interaction {
        user_id: parse_field(user_id, file, line_no, "userId")?,
        item_id: parse_field(item_id, file, line_no, "itemId")?,
        rating: parse_field(rating, file, line_no, "rating")?,
        timestamp,
    })
}

/// Parse the item file of either layout into catalog items
pub fn parse_items(path: &Path, layout: DatasetLayout) -> Result<Vec<Item>> {
    let file = layout.items_file();
    let lines = read_lines_latin1(path)?;
    let mut items = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        let item = match layout {
            DatasetLayout::MovieLens100k => parse_item_line_100k(line_trimmed, file, line_no)?,
            DatasetLayout::MovieLens1m => parse_movie_line_1m(line_trimmed, file, line_no)?,
        };
        items.push(item);
    }

    Ok(items)
}

fn parse_item_line_100k(line: &str, file: &str, line_no: usize) -> Result<Item> {
    let mut parts = line.split('|');

    let id = next_field(&mut parts, file, line_no, "itemId")?;
    let title = next_field(&mut parts, file, line_no, "title")?;
    let release_date = parts.next().unwrap_or("");
    // video release date and IMDb url are not used
    let flags: Vec<&str> = parts.skip(2).collect();

    let mut genres = Vec::new();
    for (genre, flag) in Genre::ML100K_COLUMNS.iter().zip(&flags) {
        match flag.trim() {
            "1" => genres.push(*genre),
            "0" | "" => {}
            other => {
                return Err(DataLoadError::ParseError {
                    file: file.to_string(),
                    line: line_no,
                    reason: format!("Invalid genre flag: {}", other),
                });
            }
        }
    }

    Ok(Item {
        id: parse_field(id, file, line_no, "itemId")?,
        title: title.to_string(),
        year: extract_year_from_title(title).or_else(|| extract_year_from_date(release_date)),
        genres,
    })
}

fn parse_movie_line_1m(line: &str, file: &str, line_no: usize) -> Result<Item> {
    let mut parts = line.split("::");

    let id = next_field(&mut parts, file, line_no, "itemId")?;
    let title = next_field(&mut parts, file, line_no, "title")?;
    let genres = next_field(&mut parts, file, line_no, "genres")?;

    Ok(Item {
        id: parse_field(id, file, line_no, "itemId")?,
        title: title.to_string(),
        year: extract_year_from_title(title),
        genres: parse_genres(genres)?,
    })
}

/// Extract year from movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
fn extract_year_from_title(title: &str) -> Option<u16> {
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end {
        return title[start + 1..end].parse::<u16>().ok();
    }
    None
}

/// Extract year from a 100k release date such as "01-Jan-1995"
fn extract_year_from_date(date: &str) -> Option<u16> {
    date.trim().rsplit('-').next()?.parse::<u16>().ok()
}

/// Parse a 1M genre name into Genre enum
fn parse_genre(s: &str) -> Result<Genre> {
    match s {
        "Action" => Ok(Genre::Action),
        "Adventure" => Ok(Genre::Adventure),
        "Animation" => Ok(Genre::Animation),
        "Children's" => Ok(Genre::Children),
        "Comedy" => Ok(Genre::Comedy),
        "Crime" => Ok(Genre::Crime),
        "Documentary" => Ok(Genre::Documentary),
        "Drama" => Ok(Genre::Drama),
        "Fantasy" => Ok(Genre::Fantasy),
        "Film-Noir" => Ok(Genre::FilmNoir),
        "Horror" => Ok(Genre::Horror),
        "Musical" => Ok(Genre::Musical),
        "Mystery" => Ok(Genre::Mystery),
        "Romance" => Ok(Genre::Romance),
        "Sci-Fi" => Ok(Genre::SciFi),
        "Thriller" => Ok(Genre::Thriller),
        "War" => Ok(Genre::War),
        "Western" => Ok(Genre::Western),
        "unknown" | "(no genres listed)" => Ok(Genre::Unknown),
        _ => Err(DataLoadError::InvalidValue {
            field: "genre".to_string(),
            value: s.to_string(),
        }),
    }
}

/// Parse pipe-separated genres
fn parse_genres(s: &str) -> Result<Vec<Genre>> {
    s.split('|')
        .filter(|g| !g.is_empty())
        .map(parse_genre)
        .collect()
}
