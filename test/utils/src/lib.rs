use std::env;

pub fn insta_snapshot<F: FnOnce()>(f: F) {
    let mut settings = insta::Settings::clone_current();
    let snapshot_path = env::current_dir().unwrap().join("./test/snapshots");
    settings.set_snapshot_path(snapshot_path);
    settings.bind(f);
}

pub fn plan_fixture() -> &'static str {
    return r#"
{
  "plan_summary": {
    "total_rooms": 4,
    "total_area": "220 sqm",
    "dimensions": {
      "width": "12m",
      "length": "18m"
    }
  },
  "room_details": {
    "master_bedroom": {
      "area": "24 sqm",
      "floor": "timber",
      "features": ["ensuite", "walk-in closet"]
    },
    "kitchen": {
      "area": "16 sqm",
      "floor": "tile"
    }
  },
  "elevation_details": {
    "north_side": {
      "height": "6m",
      "material": "brick"
    },
    "south_side": {}
  }
}
"#
    .trim();
}
