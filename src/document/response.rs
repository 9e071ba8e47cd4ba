use serde_json::Value;

use crate::{
    catalogue::Catalogue,
    document::{Document, Error, StatRequest, builder::Builder},
    router::{Leg, Router},
};

/// Answers the document's stat requests in order, one object per
/// request id. A request naming something unknown gets a "not found"
/// answer at its id and never affects its neighbors.
pub fn answers(document: &Document, catalogue: &Catalogue, router: &Router) -> Result<Value, Error> {
    let mut result = Vec::with_capacity(document.stat_requests.len());
    for request in &document.stat_requests {
        let answer = match request {
            StatRequest::Bus { id, name } => bus_answer(catalogue, *id, name)?,
            StatRequest::Stop { id, name } => stop_answer(catalogue, *id, name)?,
            StatRequest::Route { id, from, to } => route_answer(router, *id, from, to)?,
        };
        result.push(answer);
    }
    Ok(Value::Array(result))
}

fn not_found(id: i64) -> Result<Value, Error> {
    Ok(Builder::new()
        .start_dict()?
        .key("error_message")?
        .value("not found")?
        .key("request_id")?
        .value(id)?
        .end_dict()?
        .build()?)
}

fn bus_answer(catalogue: &Catalogue, id: i64, name: &str) -> Result<Value, Error> {
    let Some(stats) = catalogue.bus_stats(name) else {
        return not_found(id);
    };
    Ok(Builder::new()
        .start_dict()?
        .key("curvature")?
        .value(stats.curvature)?
        .key("route_length")?
        .value(stats.road_length.as_meters())?
        .key("stop_count")?
        .value(stats.stop_count)?
        .key("unique_stop_count")?
        .value(stats.unique_stop_count)?
        .key("request_id")?
        .value(id)?
        .end_dict()?
        .build()?)
}

fn stop_answer(catalogue: &Catalogue, id: i64, name: &str) -> Result<Value, Error> {
    if catalogue.stop(name).is_none() {
        return not_found(id);
    }
    let mut builder = Builder::new().start_dict()?.key("buses")?.start_array()?;
    if let Some(buses) = catalogue.buses_at(name) {
        for bus in buses {
            builder = builder.value(bus.as_ref())?;
        }
    }
    Ok(builder
        .end_array()?
        .key("request_id")?
        .value(id)?
        .end_dict()?
        .build()?)
}

fn route_answer(router: &Router, id: i64, from: &str, to: &str) -> Result<Value, Error> {
    let Some(itinerary) = router.build_route(from, to) else {
        return not_found(id);
    };
    let mut items = Builder::new()
        .start_dict()?
        .key("request_id")?
        .value(id)?
        .key("total_time")?
        .value(itinerary.total_time.as_minutes())?
        .key("items")?
        .start_array()?;
    for leg in &itinerary.legs {
        items = match leg {
            Leg::Wait { stop, time } => items
                .start_dict()?
                .key("type")?
                .value("Wait")?
                .key("stop_name")?
                .value(stop.as_ref())?
                .key("time")?
                .value(time.as_minutes())?
                .end_dict()?,
            Leg::Ride {
                bus,
                span_count,
                time,
                ..
            } => items
                .start_dict()?
                .key("type")?
                .value("Bus")?
                .key("bus")?
                .value(bus.as_ref())?
                .key("span_count")?
                .value(*span_count)?
                .key("time")?
                .value(time.as_minutes())?
                .end_dict()?,
        };
    }
    Ok(items.end_array()?.end_dict()?.build()?)
}
