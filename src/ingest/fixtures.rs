/// Test fixtures: representative JSON payloads from the USGS DV API.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parser. They reflect the real WaterML-as-JSON
/// envelope returned by:
///   https://waterservices.usgs.gov/nwis/dv/?format=json&...
///
/// USGS DV response shape:
///   response.value.timeSeries[]
///     .sourceInfo.siteCode[0].value  — site number (string)
///     .sourceInfo.siteName
///     .variable.variableCode[0].value — parameter code (string)
///     .variable.unit.unitCode
///     .variable.noDataValue          — sentinel for missing data (-999999)
///     .values[0].value[]
///       .value     — the daily mean as a STRING (not a number)
///       .dateTime  — midnight timestamp of the statistical day
///       .qualifiers[] — e.g. ["P"] or ["A"]
///
/// Note: measurement values are always JSON strings in the USGS response,
/// even though they represent numbers. Parsers must handle this.

/// Three consecutive daily mean discharge values for Burnt Range Gorge
/// (11527000) in May 2024.
pub(crate) fn fixture_burnt_range_gorge_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "TRINITY R A BURNT RANCH CA",
              "siteCode": [{ "value": "11527000", "network": "NWIS", "agencyCode": "USGS" }],
              "geoLocation": {
                "geogLocation": { "srs": "EPSG:4326", "latitude": 40.7849, "longitude": -123.4334 }
              }
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "variableName": "Streamflow, ft&#179;/s",
              "unit": { "unitCode": "ft3/s" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "2840", "qualifiers": ["P"], "dateTime": "2024-05-01T00:00:00.000" },
                { "value": "2710", "qualifiers": ["P"], "dateTime": "2024-05-02T00:00:00.000" },
                { "value": "2650", "qualifiers": ["P"], "dateTime": "2024-05-03T00:00:00.000" }
              ],
              "qualifier": [{ "qualifierCode": "P", "qualifierDescription": "Provisional data subject to revision." }]
            }]
          }
        ]
      }
    }"#
}

/// A sensor gap: the middle day carries the -999999 sentinel. The two
/// surrounding days are valid.
pub(crate) fn fixture_sensor_gap_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "TRINITY R A BURNT RANCH CA",
              "siteCode": [{ "value": "11527000", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "variableName": "Streamflow, ft&#179;/s",
              "unit": { "unitCode": "ft3/s" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "1510", "qualifiers": ["A"], "dateTime": "2024-05-01T00:00:00.000" },
                { "value": "-999999", "qualifiers": ["P", "e"], "dateTime": "2024-05-02T00:00:00.000" },
                { "value": "1485", "qualifiers": ["A"], "dateTime": "2024-05-03T00:00:00.000" }
              ],
              "qualifier": []
            }]
          }
        ]
      }
    }"#
}

/// Structurally valid response whose value array is empty — USGS returns
/// this when the site exists but has no daily values in the range.
pub(crate) fn fixture_empty_value_array_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "TRINITY R A BURNT RANCH CA",
              "siteCode": [{ "value": "11527000", "network": "NWIS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "unit": { "unitCode": "ft3/s" },
              "noDataValue": -999999.0
            },
            "values": [{ "value": [], "qualifier": [] }]
          }
        ]
      }
    }"#
}

/// Every daily value is the sentinel — a station offline for the whole
/// requested range.
pub(crate) fn fixture_all_sentinel_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "TRINITY R A BURNT RANCH CA",
              "siteCode": [{ "value": "11527000", "network": "NWIS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "unit": { "unitCode": "ft3/s" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "-999999", "qualifiers": ["P"], "dateTime": "2024-05-01T00:00:00.000" },
                { "value": "-999999", "qualifiers": ["P"], "dateTime": "2024-05-02T00:00:00.000" }
              ],
              "qualifier": []
            }]
          }
        ]
      }
    }"#
}
