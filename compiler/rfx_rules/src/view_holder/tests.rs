use rfx_ir::ProjectOptions;

use super::*;
use crate::test_util::{android, assert_rewrites, assert_unchanged};

fn adapter(body: &str) -> String {
    format!(
        "import android.view.LayoutInflater;
import android.view.View;
import android.view.ViewGroup;
import android.widget.BaseAdapter;
import android.widget.TextView;

class Rows extends BaseAdapter {{
    LayoutInflater inflater;

{body}}}
"
    )
}

#[test]
fn test_lookups_move_into_a_view_holder() {
    assert_rewrites(
        &ViewHolder,
        android(),
        &adapter(
            "    public View getView(int position, View convertView, ViewGroup parent) {
        View view = inflater.inflate(R.layout.row, parent, false);
        TextView title = (TextView) view.findViewById(R.id.title);
        title.setText(\"Row \" + position);
        return view;
    }
",
        ),
        &adapter(
            "    static class ViewHolderItem {
        TextView title;
    }
    public View getView(int position, View convertView, ViewGroup parent) {
        ViewHolderItem viewHolderItem;
        if (convertView == null) {
            convertView = inflater.inflate(R.layout.row, parent, false);
            viewHolderItem = new ViewHolderItem();
            viewHolderItem.title = (TextView) convertView.findViewById(R.id.title);
            convertView.setTag(viewHolderItem);
        } else {
            viewHolderItem = (ViewHolderItem) convertView.getTag();
        }
        View view = convertView;
        TextView title = viewHolderItem.title;
        title.setText(\"Row \" + position);
        return view;
    }
",
        ),
    );
}

#[test]
fn test_inflation_without_lookups_only_reuses_the_view() {
    assert_rewrites(
        &ViewHolder,
        android(),
        &adapter(
            "    public View getView(int position, View convertView, ViewGroup parent) {
        View row = LayoutInflater.from(parent.getContext()).inflate(R.layout.row, null);
        return row;
    }
",
        ),
        &adapter(
            "    public View getView(int position, View convertView, ViewGroup parent) {
        if (convertView == null) {
            convertView = LayoutInflater.from(parent.getContext()).inflate(R.layout.row, null);
        }
        View row = convertView;
        return row;
    }
",
        ),
    );
}

#[test]
fn test_lookups_that_depend_on_the_call_stay() {
    assert_rewrites(
        &ViewHolder,
        android(),
        &adapter(
            "    public View getView(int position, View convertView, ViewGroup parent) {
        View view = inflater.inflate(R.layout.row, parent, false);
        TextView cell = (TextView) view.findViewById(position);
        return view;
    }
",
        ),
        &adapter(
            "    public View getView(int position, View convertView, ViewGroup parent) {
        if (convertView == null) {
            convertView = inflater.inflate(R.layout.row, parent, false);
        }
        View view = convertView;
        TextView cell = (TextView) view.findViewById(position);
        return view;
    }
",
        ),
    );
}

#[test]
fn test_adapters_that_recycle_already_stay() {
    let source = adapter(
        "    public View getView(int position, View convertView, ViewGroup parent) {
        if (convertView == null) {
            convertView = inflater.inflate(R.layout.row, null);
        }
        TextView text = (TextView) convertView.findViewById(R.id.text);
        text.setText(\"Position \" + position);
        return convertView;
    }
",
    );
    assert_unchanged(&ViewHolder, android(), &source);

    let empty = adapter(
        "    public View getView(int position, View convertView, ViewGroup parent) {
        return null;
    }
",
    );
    assert_unchanged(&ViewHolder, android(), &empty);
}

#[test]
fn test_taken_holder_name_blocks_the_rewrite() {
    let source = adapter(
        "    static class ViewHolderItem {
    }

    public View getView(int position, View convertView, ViewGroup parent) {
        View view = inflater.inflate(R.layout.row, parent, false);
        TextView title = (TextView) view.findViewById(R.id.title);
        return view;
    }
",
    );
    assert_unchanged(&ViewHolder, android(), &source);
}

#[test]
fn test_needs_android() {
    let source = adapter(
        "    public View getView(int position, View convertView, ViewGroup parent) {
        View view = inflater.inflate(R.layout.row, parent, false);
        return view;
    }
",
    );
    assert_unchanged(&ViewHolder, ProjectOptions::default(), &source);
}
