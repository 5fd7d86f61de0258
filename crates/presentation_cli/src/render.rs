//! Plain-text rendering of command results

use std::fmt::Write;

use application::PageState;
use domain::{AuthSession, BlogPost, Place, RouteSummary};

/// Numbered result list, one place per block
pub fn places(places: &[Place]) -> String {
    if places.is_empty() {
        return "No places found.\n".to_string();
    }

    let mut out = String::new();
    for (i, place) in places.iter().enumerate() {
        let _ = writeln!(out, "[{i}] {}", place.display_title());
        if !place.road_address.is_empty() {
            let _ = writeln!(out, "    {}", place.road_address);
        }
        if !place.telephone.is_empty() {
            let _ = writeln!(out, "    tel {}", place.telephone);
        }
        match (place.coordinates, &place.position_error) {
            (Some(c), _) => {
                let _ = writeln!(out, "    at {c}");
            },
            (None, Some(reason)) => {
                let _ = writeln!(out, "    malformed position: {reason}");
            },
            (None, None) => out.push_str("    position unknown\n"),
        }
    }
    out
}

pub fn blogs(posts: &[BlogPost]) -> String {
    if posts.is_empty() {
        return "No posts found.\n".to_string();
    }

    let mut out = String::new();
    for post in posts {
        let _ = writeln!(out, "* {}", post.display_title());
        let _ = writeln!(out, "  {} ({})", post.blogger_name, post.post_date.as_deref().unwrap_or("undated"));
        let _ = writeln!(out, "  {}", post.display_description());
        let _ = writeln!(out, "  {}", post.link);
    }
    out
}

/// Route headline plus fares when the provider sent them
pub fn route(summary: &RouteSummary) -> String {
    let mut out = format!("Route: {summary}\n");
    if let Some(taxi) = summary.taxi_fare {
        let _ = writeln!(out, "  taxi fare {taxi} KRW");
    }
    if let Some(fuel) = summary.fuel_price {
        let _ = writeln!(out, "  fuel {fuel} KRW");
    }
    let _ = writeln!(out, "  {} points on the path", summary.path.len());
    out
}

pub fn page(state: &PageState) -> String {
    let mut out = String::new();
    if let Some(position) = &state.my_position {
        let _ = writeln!(out, "From: {}", position.coordinate);
    }
    if let Some(destination) = state.destination {
        let _ = writeln!(out, "To:   {destination}");
    }
    if let Some(summary) = &state.route {
        out.push_str(&route(summary));
    }
    out
}

pub fn session(session: &AuthSession) -> String {
    match (session.is_authenticated, session.email()) {
        (true, Some(email)) => format!("Signed in as {email}\n"),
        (true, None) => "Signed in\n".to_string(),
        (false, _) => "Signed out\n".to_string(),
    }
}
