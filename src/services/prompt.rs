//! Renders the recommendation prompt sent to the completion service.
//!
//! The wording, line order and conditional structure are load-bearing: they shape what
//! the model returns and what [`parse_titles`](super::generator::parse_titles) expects.

use crate::models::{LocationInfo, RecommendationRequest, WeatherInfo};

/// Viewers younger than this get the R-rating exclusion line
const ADULT_AGE: u32 = 18;

const RESPONSE_FORMAT: &str = "\nOnly list the movie titles without any additional text or explanation. \
Provide the response in the following format:\n\
1. Movie Title 1\n2. Movie Title 2\n3. Movie Title 3\n4. Movie Title 4\n5. Movie Title 5";

/// Builds the prompt for one recommendation request
pub fn build_prompt(
    request: &RecommendationRequest,
    location: Option<&LocationInfo>,
    weather: Option<&WeatherInfo>,
) -> String {
    let mut prompt = format!(
        "Recommend a list of 5 {}-language movie titles for a person based on the following details:\n",
        request.language
    );

    if let Some(age) = request.age.filter(|age| *age > 0) {
        prompt.push_str(&format!("Age: {}\n", age));
    }

    if let Some((city, state)) = location.and_then(|l| {
        non_empty(l.city.as_deref()).zip(non_empty(l.state.as_deref()))
    }) {
        prompt.push_str(&format!("Location: {}, {}\n", city, state));
    }

    if let Some(weather) = weather {
        prompt.push_str(&format!("Weather: {}\n", weather));
    }

    prompt.push_str(&format!(
        "Watch Time: {} on a {} in {}\n",
        request.current_time, request.day_of_week, request.month
    ));

    if let Some(genres) = non_empty(request.genres.as_deref()) {
        prompt.push_str(&format!("Favorite Genres: {}\n", genres));
    }

    if let Some(mood) = non_empty(request.mood.as_deref()) {
        prompt.push_str(&format!("Mood: {}\n", mood));
    }

    push_title_block(
        &mut prompt,
        "Do not suggest the following movies:",
        &request.seen_movies,
    );

    if request.age.is_some_and(|age| age < ADULT_AGE) {
        prompt.push_str("Do not suggest movies that are rated R.\n");
    }

    push_title_block(
        &mut prompt,
        "They liked the following movies:",
        &request.liked_movies,
    );
    push_title_block(
        &mut prompt,
        "They disliked the following movies:",
        &request.disliked_movies,
    );

    prompt.push_str("No adult movies.");
    prompt.push_str(RESPONSE_FORMAT);

    prompt
}

/// Heading, then one title per line. The first title is indented by one space.
fn push_title_block(prompt: &mut String, heading: &str, titles: &[String]) {
    if titles.is_empty() {
        return;
    }
    prompt.push_str(heading);
    prompt.push_str("\n ");
    prompt.push_str(&titles.join("\n"));
    prompt.push('\n');
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
