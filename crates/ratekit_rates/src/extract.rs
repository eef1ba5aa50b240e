//! Rate extraction: `{ hotel, hotelRates: [...] }` to flat [`RateRecord`]s.

use chrono::{Days, NaiveDate};
use serde_json::{Map, Value};

use crate::conf::{C_TAG_NAME_BREAKFAST, N_PRICE_SCALE_DEFAULT};
use crate::spec::{ExtractedRates, HotelHeader, RateRecord, RatesError};
use crate::util::{
    get_optional, get_required, join_path, read_array, read_date, read_decimal, read_i64,
    read_object, read_optional_text, read_text, read_truthy,
};

/// Extract every rate offer with the default price scale.
pub fn extract_rates(document: &Value) -> Result<ExtractedRates, RatesError> {
    extract_rates_with_scale(document, N_PRICE_SCALE_DEFAULT)
}

/// Extract every rate offer, rounding prices to `price_scale` places.
///
/// Offers keep document order. The first failing offer aborts extraction.
pub fn extract_rates_with_scale(
    document: &Value,
    price_scale: u32,
) -> Result<ExtractedRates, RatesError> {
    let obj_root = read_object(document, "$")?;

    let l_offers = read_array(get_required(obj_root, "hotelRates", "")?, "hotelRates")?;
    let mut rates = Vec::with_capacity(l_offers.len());
    for (n_idx, offer) in l_offers.iter().enumerate() {
        rates.push(extract_rate(offer, &format!("hotelRates[{n_idx}]"), price_scale)?);
    }

    let hotel = extract_hotel_header(obj_root)?;

    Ok(ExtractedRates { hotel, rates })
}

/// Read `hotel.hotelID` and `hotel.name`.
pub fn extract_hotel_header(obj_root: &Map<String, Value>) -> Result<HotelHeader, RatesError> {
    let obj_hotel = read_object(get_required(obj_root, "hotel", "")?, "hotel")?;
    let hotel_id = read_text(get_required(obj_hotel, "hotelID", "hotel")?, "hotel.hotelID")?;
    let name = read_text(get_required(obj_hotel, "name", "hotel")?, "hotel.name")?;
    Ok(HotelHeader { hotel_id, name })
}

/// Flatten one `hotelRates` element.
pub fn extract_rate(offer: &Value, path: &str, price_scale: u32) -> Result<RateRecord, RatesError> {
    let obj_offer = read_object(offer, path)?;

    let arrival_date = read_date(
        get_required(obj_offer, "targetDay", path)?,
        &join_path(path, "targetDay"),
    )?;
    let c_path_los = join_path(path, "los");
    let n_los = read_i64(get_required(obj_offer, "los", path)?, &c_path_los)?;
    let departure_date = derive_departure_date(arrival_date, n_los)
        .ok_or_else(|| RatesError::conversion(&c_path_los, n_los.to_string(), "date offset"))?;

    let c_path_price = join_path(path, "price");
    let obj_price = read_object(get_required(obj_offer, "price", path)?, &c_path_price)?;
    let price = read_decimal(
        get_required(obj_price, "numericFloat", &c_path_price)?,
        &join_path(&c_path_price, "numericFloat"),
        price_scale,
    )?;
    let currency = read_optional_text(obj_price, "currency", &c_path_price)?;

    let rate_name = read_optional_text(obj_offer, "rateName", path)?;
    let adults = read_i64(
        get_required(obj_offer, "adults", path)?,
        &join_path(path, "adults"),
    )?;
    let breakfast_included = u8::from(detect_breakfast(obj_offer, path)?);

    Ok(RateRecord {
        arrival_date,
        departure_date,
        price,
        currency,
        rate_name,
        adults,
        breakfast_included,
    })
}

/// `arrival + los` days; negative stays go backwards. `None` on overflow.
pub fn derive_departure_date(arrival_date: NaiveDate, los: i64) -> Option<NaiveDate> {
    let n_days = Days::new(los.unsigned_abs());
    if los >= 0 {
        arrival_date.checked_add_days(n_days)
    } else {
        arrival_date.checked_sub_days(n_days)
    }
}

/// Scan `rateTags` for a breakfast tag with a truthy `shape`.
///
/// Stops at the first hit. The `shape` flag is only read for tags named
/// breakfast, so unrelated tags never fail the offer.
pub fn detect_breakfast(obj_offer: &Map<String, Value>, path: &str) -> Result<bool, RatesError> {
    let Some(value_tags) = get_optional(obj_offer, "rateTags") else {
        return Ok(false);
    };
    let c_path_tags = join_path(path, "rateTags");
    let l_tags = read_array(value_tags, &c_path_tags)?;

    for (n_idx, tag) in l_tags.iter().enumerate() {
        let Some(obj_tag) = tag.as_object() else {
            continue;
        };
        let Some(Value::String(c_name)) = obj_tag.get("name") else {
            continue;
        };
        if !c_name.eq_ignore_ascii_case(C_TAG_NAME_BREAKFAST) {
            continue;
        }

        let value_shape = obj_tag.get("shape").unwrap_or(&Value::Null);
        if read_truthy(value_shape, &format!("{c_path_tags}[{n_idx}].shape"))? {
            return Ok(true);
        }
    }

    Ok(false)
}
